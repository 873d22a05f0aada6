//! Editor-level settings for the sequence tooling.

use serde::{Deserialize, Serialize};

use crate::error::SequenceError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimpleAnimSettings {
    /// Skeletal mesh assigned as preview mesh by [`crate::assets::assign_preview_mesh`].
    pub default_skeletal_mesh: Option<String>,
}

impl SimpleAnimSettings {
    pub fn from_json(s: &str) -> Result<Self, SequenceError> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let settings = SimpleAnimSettings::from_json("{}").unwrap();
        assert_eq!(settings, SimpleAnimSettings::default());

        let settings =
            SimpleAnimSettings::from_json(r#"{"default_skeletal_mesh":"/Game/Mannequin/SKM_Quinn"}"#)
                .unwrap();
        assert_eq!(
            settings.default_skeletal_mesh.as_deref(),
            Some("/Game/Mannequin/SKM_Quinn")
        );
    }
}

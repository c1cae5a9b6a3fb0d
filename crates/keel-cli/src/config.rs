use std::io::Read;
use std::path::Path;

use keel_core::DeploymentInputs;

/// Load deployment inputs from a parameters file, or stdin for `-`.
///
/// The document is read as raw JSON first so the ARM parameters shape can
/// be flattened before typed deserialization.
pub fn load_inputs(source: &str) -> eyre::Result<DeploymentInputs> {
    let contents = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| eyre::eyre!("failed to read parameters from stdin: {e}"))?;
        buf
    } else {
        let path = Path::new(source);
        std::fs::read_to_string(path)
            .map_err(|e| eyre::eyre!("failed to read parameters at {}: {e}", path.display()))?
    };

    let json: serde_json::Value = serde_json::from_str(&contents)?;
    if !json.is_object() {
        return Err(eyre::eyre!("parameters file is not a JSON object"));
    }

    let inputs = DeploymentInputs::from_value(json)?;
    tracing::debug!(source, "loaded deployment inputs");
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_arm_parameters_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.parameters.json");
        fs::write(
            &path,
            r#"{
                "contentVersion": "1.0.0.0",
                "parameters": {
                    "applicationName": { "value": "chat" },
                    "environmentName": { "value": "dev" },
                    "region": { "value": "eastus" },
                    "createPlatformGroup": { "value": false },
                    "createLoggingGroup": { "value": true },
                    "existingPlatformResourceGroup": { "value": "rg-shared-ai" },
                    "existingPlatformName": { "value": "aif-shared" }
                }
            }"#,
        )
        .unwrap();

        let inputs = load_inputs(path.to_str().unwrap()).unwrap();
        assert_eq!(inputs.application_name.as_deref(), Some("chat"));
        assert_eq!(inputs.create_platform_group, Some(false));
        assert_eq!(
            inputs.existing_platform_resource_group.as_deref(),
            Some("rg-shared-ai")
        );
    }

    #[test]
    fn rejects_non_object_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let err = load_inputs(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("not a JSON object"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let err = load_inputs(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("absent.json"));
    }
}

use crate::model::AppEntry;
use crate::sources::{Source, SourceError};
use log::debug;
use serde::Deserialize;
use std::process::{Command, Stdio};

const POWERSHELL: &str = "powershell";
const SCRIPT: &str = "[Console]::OutputEncoding = [System.Text.Encoding]::UTF8; \
    Get-StartApps | Select-Object Name, AppID | ConvertTo-Json -Compress";

/// Start menu apps as reported by `Get-StartApps`.
pub struct StartMenuSource;

#[derive(Deserialize)]
struct StartApp {
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "AppID")]
    app_id: Option<String>,
}

// ConvertTo-Json emits a bare object when there is a single result.
#[derive(Deserialize)]
#[serde(untagged)]
enum StartApps {
    Many(Vec<StartApp>),
    One(StartApp),
}

impl Source for StartMenuSource {
    fn name(&self) -> &'static str {
        "start-menu"
    }

    fn scan(&self) -> Result<Vec<AppEntry>, SourceError> {
        let output = Command::new(POWERSHELL)
            .args(["-NoProfile", "-NonInteractive", "-Command", SCRIPT])
            .stdin(Stdio::null())
            .output()
            .map_err(|source| SourceError::Spawn { tool: POWERSHELL, source })?;

        if !output.status.success() {
            return Err(SourceError::ToolFailed {
                tool: POWERSHELL,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_start_apps(&String::from_utf8_lossy(&output.stdout))
    }
}

pub fn parse_start_apps(json: &str) -> Result<Vec<AppEntry>, SourceError> {
    // A BOM sneaks in on some consoles.
    let json = json.trim_start_matches('\u{feff}').trim();
    if json.is_empty() {
        return Ok(Vec::new());
    }

    let apps = match serde_json::from_str::<StartApps>(json)? {
        StartApps::Many(apps) => apps,
        StartApps::One(app) => vec![app],
    };

    let entries = apps
        .into_iter()
        .filter_map(|app| {
            let name = app.name.map(|n| n.trim().to_string()).unwrap_or_default();
            let id = app.app_id.map(|i| i.trim().to_string()).unwrap_or_default();
            if name.is_empty() || id.is_empty() {
                debug!("Skipping incomplete start menu record {:?}/{:?}", name, id);
                return None;
            }
            Some(AppEntry::app_id(name, id))
        })
        .collect();
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LaunchHandle;

    #[test]
    fn parses_array_output() {
        let json = r#"[{"Name":"Notepad","AppID":"{1AC14E77}\\notepad.exe"},{"Name":"Paint","AppID":"Microsoft.Paint_8wekyb3d8bbwe!App"}]"#;
        let entries = parse_start_apps(json).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Notepad");
        assert_eq!(
            entries[0].handle,
            LaunchHandle::AppId("{1AC14E77}\\notepad.exe".to_string())
        );
        assert_eq!(entries[1].name, "Paint");
    }

    #[test]
    fn parses_single_object_output() {
        let entries = parse_start_apps(r#"{"Name":"Calculator","AppID":"calc"}"#).unwrap();
        assert_eq!(entries, vec![AppEntry::app_id("Calculator", "calc")]);
    }

    #[test]
    fn skips_records_missing_name_or_id() {
        let json = r#"[{"Name":"","AppID":"x"},{"Name":"Tool","AppID":null},{"Name":"Ok","AppID":"ok"}]"#;
        let entries = parse_start_apps(json).unwrap();
        assert_eq!(entries, vec![AppEntry::app_id("Ok", "ok")]);
    }

    #[test]
    fn empty_output_is_no_apps() {
        assert!(parse_start_apps("").unwrap().is_empty());
        assert!(parse_start_apps("\u{feff}\r\n").unwrap().is_empty());
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(matches!(
            parse_start_apps("Get-StartApps : not recognized"),
            Err(SourceError::Parse(_))
        ));
    }
}

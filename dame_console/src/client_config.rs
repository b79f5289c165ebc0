use anyhow::Context;
use dame_client::timing::Timing;
use serde::{Deserialize, Serialize};


// Optional settings file. Everything has a default, so an empty file is valid.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub timing: Timing,
}

pub fn parse_config(contents: &str) -> anyhow::Result<ClientConfig> {
    // `serde_yaml` rejects an empty document.
    if contents.trim().is_empty() {
        return Ok(ClientConfig::default());
    }
    Ok(serde_yaml::from_str(contents)?)
}

pub fn read_config_file(path: &str) -> anyhow::Result<ClientConfig> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("Reading config file {}", path))?;
    parse_config(&contents).with_context(|| format!("Parsing config file {}", path))
}


#[cfg(test)]
mod tests {
    use std::time::Duration;

    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn partial_timing() {
        let config = parse_config(indoc! {"
            timing:
              poll_interval: 1s
              local_move: 150ms
        "})
        .unwrap();
        assert_eq!(config.timing.poll_interval, Duration::from_secs(1));
        assert_eq!(config.timing.replay_step, Duration::from_millis(300));
        assert_eq!(config.timing.local_move, Duration::from_millis(150));
    }

    #[test]
    fn empty_file() {
        assert_eq!(parse_config("").unwrap().timing, Timing::default());
    }

    #[test]
    fn bad_duration() {
        assert!(parse_config("timing: { poll_interval: soon }").is_err());
    }
}

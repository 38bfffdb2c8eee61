use crate::commands::{CmdMessage, CmdResult, ShipdexPaths};
use crate::config::ShipdexConfig;
use crate::error::Result;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(paths: &ShipdexPaths, action: ConfigAction) -> Result<CmdResult> {
    let dir = &paths.data_dir;
    match action {
        ConfigAction::ShowAll => {
            let config = ShipdexConfig::load(dir)?;
            Ok(CmdResult::default().with_config(config))
        }
        ConfigAction::ShowKey(key) => {
            let config = ShipdexConfig::load(dir)?;
            let value = config.get(&key)?;
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::info(value));
            Ok(result)
        }
        ConfigAction::Set(key, value) => {
            let mut config = ShipdexConfig::load(dir)?;
            config.set(&key, &value)?;
            config.save(dir)?;

            let display_val = config.get(&key)?;
            let mut result = CmdResult::default().with_config(config);
            result.add_message(CmdMessage::success(format!(
                "{} set to {}",
                key,
                if display_val.is_empty() {
                    "(unset)"
                } else {
                    display_val.as_str()
                }
            )));
            Ok(result)
        }
    }
}

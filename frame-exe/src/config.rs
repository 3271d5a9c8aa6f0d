//! User configuration options.

use crate::{BASE_DIR, CLIOptions};
use dirs::config_dir;
use log::{error, info, warn};
use math::{FRACUNIT, Fixed};
use nanoserde::{DeRon, SerRon};
use render_trait::{Detail, DisplayConfig};
use std::{
    fs::{File, OpenOptions, create_dir_all},
    io::{self, Read, Write},
    path::PathBuf,
};

const LOG_TAG: &str = "UserConfig";

fn get_cfg_file() -> io::Result<PathBuf> {
    let mut dir = config_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Couldn't find user config dir"))?;
    dir.push(BASE_DIR);
    if !dir.exists() {
        create_dir_all(&dir)?;
    }
    dir.push("frame.ron");
    Ok(dir)
}

#[derive(Debug, Clone, PartialEq, DeRon, SerRon)]
pub struct UserConfig {
    pub width: u32,
    pub height: u32,
    pub low_detail: bool,
    /// Percent, 100 is square pixels
    pub aspect: u32,
    pub smooth_lighting: bool,
    pub flashing_hom: bool,
    pub output: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 400,
            low_detail: false,
            aspect: 100,
            smooth_lighting: true,
            flashing_hom: false,
            output: String::from("r4d-frame.png"),
        }
    }
}

impl UserConfig {
    /// `load` will read the config, a missing or unreadable file is replaced
    /// with the defaults
    pub fn load() -> io::Result<Self> {
        let path = get_cfg_file()?;

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;
        let mut buf = String::new();
        if file.read_to_string(&mut buf)? == 0 {
            return UserConfig::create_default(&mut file, &path);
        }
        match UserConfig::deserialize_ron(&buf) {
            Ok(data) => {
                info!(target: LOG_TAG, "Loaded user config file");
                Ok(data)
            }
            Err(e) => {
                warn!(target: LOG_TAG, "Could not deserialise {:?}: {}, recreating config", path, e);
                let mut file = File::create(&path)?;
                UserConfig::create_default(&mut file, &path)
            }
        }
    }

    fn create_default(file: &mut File, path: &PathBuf) -> io::Result<Self> {
        let config = UserConfig::default();
        info!(target: LOG_TAG, "Created default user config file");
        file.write_all(config.serialize_ron().as_bytes())?;
        info!(target: LOG_TAG, "Saved user config to {:?}", path);
        Ok(config)
    }

    pub fn write(&self) {
        let result = get_cfg_file()
            .and_then(File::create)
            .and_then(|mut file| file.write_all(self.serialize_ron().as_bytes()));
        if let Err(err) = result {
            error!(target: LOG_TAG, "Could not write config: {}", err);
        }
    }

    /// Sync the CLI options and UserOptions with each other
    pub fn sync_cli(&mut self, cli: &mut CLIOptions) {
        info!(target: LOG_TAG, "Checking CLI options");

        if cli.width != 0 && cli.width != self.width {
            self.width = cli.width;
        } else {
            cli.width = self.width;
        }

        if cli.height != 0 && cli.height != self.height {
            self.height = cli.height;
        } else {
            cli.height = self.height;
        }

        if let Some(f) = cli.low_detail {
            self.low_detail = f;
        } else {
            cli.low_detail = Some(self.low_detail);
        }

        if let Some(a) = cli.aspect {
            self.aspect = a;
        } else {
            cli.aspect = Some(self.aspect);
        }

        if let Some(f) = cli.smooth_lighting {
            self.smooth_lighting = f;
        } else {
            cli.smooth_lighting = Some(self.smooth_lighting);
        }

        if let Some(f) = cli.flashing_hom {
            self.flashing_hom = f;
        } else {
            cli.flashing_hom = Some(self.flashing_hom);
        }

        if let Some(output) = &cli.output {
            output.clone_into(&mut self.output);
        } else {
            cli.output = Some(self.output.clone());
        }
    }

    pub fn display_config(&self) -> DisplayConfig {
        DisplayConfig {
            width: self.width.max(1) as usize,
            height: self.height.max(1) as usize,
            detail: if self.low_detail { Detail::Low } else { Detail::High },
            aspect: Fixed::new((FRACUNIT as i64 * self.aspect.max(1) as i64 / 100) as i32),
            smooth_lighting: self.smooth_lighting,
            flashing_hom: self.flashing_hom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli() -> CLIOptions {
        CLIOptions {
            verbose: None,
            level: String::from("square"),
            width: 0,
            height: 0,
            low_detail: None,
            aspect: None,
            smooth_lighting: None,
            flashing_hom: None,
            pitch: 0,
            frames: 1,
            output: None,
        }
    }

    #[test]
    fn cli_overrides_config() {
        let mut config = UserConfig::default();
        let mut options = cli();
        options.width = 320;
        options.low_detail = Some(true);
        config.sync_cli(&mut options);
        assert_eq!(config.width, 320);
        assert!(config.low_detail);
        // Unset options are filled from the config
        assert_eq!(options.height, 400);
        assert_eq!(options.output.as_deref(), Some("r4d-frame.png"));
    }

    #[test]
    fn ron_round_trip() {
        let config = UserConfig {
            aspect: 120,
            ..UserConfig::default()
        };
        let text = config.serialize_ron();
        assert_eq!(UserConfig::deserialize_ron(&text).unwrap(), config);
    }

    #[test]
    fn display_config_from_user() {
        let config = UserConfig {
            width: 320,
            height: 200,
            low_detail: true,
            aspect: 120,
            ..UserConfig::default()
        };
        let display = config.display_config();
        assert_eq!(display.width, 320);
        assert_eq!(display.detail, Detail::Low);
        assert_eq!(display.aspect, Fixed::new(FRACUNIT * 6 / 5));
    }
}

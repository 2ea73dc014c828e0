//! Utilities to load the job configuration from `TOML` files at runtime.
use crate::{entities::Location, Error, Result};
use serde::{Deserialize, Serialize};
use std::{
    env,
    path::{Path, PathBuf},
};

macro_rules! err {
    ($reason:expr) => {
        Err(Error::config(format!("Config: {}", $reason)))
    };
}
pub(self) use err;

const DEFAULT_FILENAME: &'static str = "weather.toml";

#[derive(Debug)]
pub struct Config {
    pub weather_data: weather_data::Properties,
    pub visual_crossing: visual_crossing::Properties,
    pub ingest: ingest::Properties,
    pub locations: Vec<Location>,
}
impl Config {
    pub fn new(optional_path: Option<PathBuf>) -> Result<Config> {
        config_file::load(optional_path)
    }
    /// Check the configuration is usable before any fetch begins.
    ///
    /// A problem found here is fatal to the run, the job should not get as
    /// far as opening a connection with a configuration it cannot use.
    ///
    pub fn validate(&self) -> Result<()> {
        let api_key = self.visual_crossing.api_key.trim();
        if api_key.is_empty() || api_key == visual_crossing::DEFAULT_KEY || api_key.to_uppercase().starts_with("YOUR_")
        {
            err!(format!("A Visual Crossing API key is required (set {}).", visual_crossing::ENV_KEY))?;
        }
        if !matches!(self.visual_crossing.unit_group.as_str(), "metric" | "us") {
            err!(format!("Unit group '{}' must be 'metric' or 'us'.", self.visual_crossing.unit_group))?;
        }
        if self.locations.is_empty() {
            err!(format!("At least 1 location is required (set {}).", locations::ENV_LOCATIONS))?;
        }
        let mut aliases: Vec<&str> = vec![];
        for location in &self.locations {
            if location.name.trim().is_empty() || location.alias.trim().is_empty() {
                err!("Location names and aliases cannot be empty.")?;
            }
            if aliases.contains(&location.alias.as_str()) {
                err!(format!("Location alias '{}' is used more than once.", location.alias))?;
            }
            aliases.push(location.alias.as_str());
            if let Err(error) = toolslib::date_time::get_tz(&location.tz) {
                err!(format!("Location '{}' timezone: {}", location.alias, error))?;
            }
        }
        if !(1..=7).contains(&self.ingest.fetch_days) {
            err!(format!("Fetch days ({}) must be between 1 and 7.", self.ingest.fetch_days))?;
        }
        if !(1..=365).contains(&self.ingest.lookback_days) {
            err!(format!("Lookback days ({}) must be between 1 and 365.", self.ingest.lookback_days))?;
        }
        Ok(())
    }
}
impl TryFrom<&str> for Config {
    type Error = Error;
    /// Attempt to load the configuration from a string.
    fn try_from(config_str: &str) -> std::result::Result<Self, Self::Error> {
        Ok(Self::from(config_file::load_str(config_str)?))
    }
}

mod config_file {
    //! The configuration file manager.
    use super::*;
    use std::{fs::File, io::prelude::*};
    use toml;

    /// Try to get the configuration from the file pathname. If it was not provided
    /// try the default filename. If the default filename does not exist use defaults.
    pub fn load(optional_path: Option<PathBuf>) -> Result<Config> {
        match optional_path {
            Some(path) => match (path.exists(), path.is_file()) {
                (true, true) => Ok(Config::from(load_path(&path)?)),
                (true, false) => err!("Configuration name is not a file."),
                _ => err!("Configuration name not found."),
            },
            None => {
                // try loading the default filename
                let path = PathBuf::from(DEFAULT_FILENAME);
                match (path.exists(), path.is_file()) {
                    (true, true) => Ok(Config::from(load_path(&path)?)),
                    (true, false) => err!(format!("{} is not a file.", DEFAULT_FILENAME)),
                    _ => {
                        log::info!("Did not find a configuration file, using defaults");
                        Ok(Config::from(ConfigDocument::default()))
                    }
                }
            }
        }
    }

    /// The structure that holds the weather job configuration document.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ConfigDocument {
        #[serde(rename = "weather-data")]
        pub weather_data: Option<weather_data::Document>,
        #[serde(rename = "visual-crossing")]
        pub visual_crossing: Option<visual_crossing::Document>,
        pub ingest: Option<ingest::Document>,
        pub locations: Option<Vec<locations::Document>>,
    }
    impl From<ConfigDocument> for Config {
        /// Create the configuration from the configuration document instance.
        fn from(config_document: ConfigDocument) -> Self {
            Config {
                weather_data: weather_data::Properties::from(config_document.weather_data),
                visual_crossing: visual_crossing::Properties::from(config_document.visual_crossing),
                ingest: ingest::Properties::from(config_document.ingest),
                locations: locations::from_documents(config_document.locations),
            }
        }
    }

    /// Attempts to load the configuration from a file.
    fn load_path(path: &Path) -> Result<ConfigDocument> {
        match File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                match file.read_to_string(&mut contents) {
                    Ok(_) => load_str(&contents),
                    Err(err) => {
                        err!(format!("Could not read '{}' contents ({})", path.display(), err))
                    }
                }
            }
            Err(err) => {
                err!(format!("Could not open '{}' ({}).", path.display(), err))
            }
        }
    }

    /// Attempts to load the configuration from a string.
    pub fn load_str(config: &str) -> Result<ConfigDocument> {
        match toml::from_str::<ConfigDocument>(config) {
            Ok(config) => Ok(config),
            Err(err) => err!(format!("Could not load the configuration ({}).", err)),
        }
    }
}

mod weather_data {
    //! The weather data directory configuration table.
    use super::*;

    pub const ENV_DIRNAME: &'static str = "WEATHER_DATA";
    pub const DEFAULT_DIRNAME: &'static str = "weather_data";

    #[derive(Debug)]
    pub struct Properties {
        pub directory: String,
    }
    impl From<Option<Document>> for Properties {
        /// Convert the document into the configuration table.
        fn from(value: Option<Document>) -> Self {
            match value {
                Some(dict) => {
                    let directory = dict.directory.unwrap_or_else(default_dirname);
                    Properties { directory }
                }
                None => Properties { directory: default_dirname() },
            }
        }
    }

    /// The configuration that can be serialized and deserialized.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct Document {
        pub directory: Option<String>,
    }

    /// Gets the default directory from the process environment if [ENV_DIRNAME] is defined.
    fn default_dirname() -> String {
        env::var(ENV_DIRNAME).unwrap_or_else(|_| DEFAULT_DIRNAME.to_string())
    }
}

mod visual_crossing {
    //! The Visual Crossing configuration data.
    use super::*;

    pub const ENV_KEY: &'static str = "VISUAL_CROSSING_KEY";
    pub const DEFAULT_KEY: &'static str = "API_KEY";
    pub const DEFAULT_URI: &'static str =
        "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/timeline";
    pub const DEFAULT_UNIT_GROUP: &'static str = "metric";

    #[derive(Debug)]
    pub struct Properties {
        pub endpoint: String,
        pub api_key: String,
        pub unit_group: String,
    }
    impl From<Option<Document>> for Properties {
        /// Convert the document into the configuration table.
        fn from(value: Option<Document>) -> Self {
            match value {
                Some(dict) => {
                    let endpoint = dict.endpoint.unwrap_or(DEFAULT_URI.to_string());
                    let api_key = dict.api_key.unwrap_or_else(default_api_key);
                    let unit_group = dict.unit_group.unwrap_or(DEFAULT_UNIT_GROUP.to_string());
                    Properties { endpoint, api_key, unit_group }
                }
                None => Properties {
                    endpoint: DEFAULT_URI.to_string(),
                    api_key: default_api_key(),
                    unit_group: DEFAULT_UNIT_GROUP.to_string(),
                },
            }
        }
    }

    /// The Visual Crossing configuration options.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct Document {
        /// The API end-point.
        pub endpoint: Option<String>,
        /// The API key token.
        #[serde(rename = "api-key")]
        pub api_key: Option<String>,
        /// The units observations are reported in (`metric` or `us`).
        #[serde(rename = "unit-group")]
        pub unit_group: Option<String>,
    }

    /// Gets the default API key from the process environment if [ENV_KEY] is defined.
    fn default_api_key() -> String {
        env::var(ENV_KEY).unwrap_or_else(|_| DEFAULT_KEY.to_string())
    }
}

mod ingest {
    //! The ingestion window configuration data.
    use super::*;

    pub const DEFAULT_FETCH_DAYS: u32 = 1;
    pub const DEFAULT_LOOKBACK_DAYS: u32 = 30;

    #[derive(Debug)]
    pub struct Properties {
        /// How many days back from today each run fetches.
        pub fetch_days: u32,
        /// The trailing window size used by the aggregate reports.
        pub lookback_days: u32,
    }
    impl From<Option<Document>> for Properties {
        /// Convert the document into the configuration table.
        fn from(value: Option<Document>) -> Self {
            match value {
                Some(dict) => Properties {
                    fetch_days: dict.fetch_days.unwrap_or(DEFAULT_FETCH_DAYS),
                    lookback_days: dict.lookback_days.unwrap_or(DEFAULT_LOOKBACK_DAYS),
                },
                None => Properties { fetch_days: DEFAULT_FETCH_DAYS, lookback_days: DEFAULT_LOOKBACK_DAYS },
            }
        }
    }

    /// The ingestion configuration options.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct Document {
        #[serde(rename = "fetch-days")]
        pub fetch_days: Option<u32>,
        #[serde(rename = "lookback-days")]
        pub lookback_days: Option<u32>,
    }
}

mod locations {
    //! The fetch locations configuration data.
    use super::*;

    pub const ENV_LOCATIONS: &'static str = "WEATHER_LOCATIONS";

    /// A location entry in the configuration document.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct Document {
        /// The query string the provider resolves.
        pub name: String,
        /// The store key, defaults to a normalized form of the name.
        pub alias: Option<String>,
        /// The IANA timezone name, defaults to UTC.
        pub timezone: Option<String>,
    }

    /// Convert the document entries into locations. When the document has no
    /// entries fall back to the [ENV_LOCATIONS] comma separated list.
    pub fn from_documents(value: Option<Vec<Document>>) -> Vec<Location> {
        let documents = match value {
            Some(documents) if !documents.is_empty() => documents,
            _ => env_documents(),
        };
        documents
            .into_iter()
            .map(|document| {
                let alias = document.alias.unwrap_or_else(|| derive_alias(&document.name));
                Location {
                    name: document.name,
                    alias,
                    tz: document.timezone.unwrap_or_else(|| "UTC".to_string()),
                }
            })
            .collect()
    }

    /// Build location documents from the process environment.
    fn env_documents() -> Vec<Document> {
        match env::var(ENV_LOCATIONS) {
            Err(_) => vec![],
            Ok(names) => names
                .split(',')
                .filter(|name| !name.trim().is_empty())
                .map(|name| Document { name: name.trim().to_string(), alias: None, timezone: None })
                .collect(),
        }
    }

    /// Normalize a provider query string into a store key.
    fn derive_alias(name: &str) -> String {
        name.to_lowercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect()
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn aliases() {
            assert_eq!(derive_alias("Kungsbacka"), "kungsbacka");
            assert_eq!(derive_alias("New York,NY"), "new_york_ny");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load() {
        let config = r#"
            [weather-data]
            directory = "directory/name"

            [visual-crossing]
            endpoint = "http://end/point"
            api-key = "api-key"
            unit-group = "us"

            [ingest]
            fetch-days = 2
            lookback-days = 14

            [[locations]]
            name = "Kungsbacka"
            alias = "kungsbacka"
            timezone = "Europe/Stockholm"

            [[locations]]
            name = "Boise,ID"
            "#;
        let testcase = Config::try_from(config).unwrap();
        assert_eq!(testcase.weather_data.directory, "directory/name");
        assert_eq!(testcase.visual_crossing.endpoint, "http://end/point");
        assert_eq!(testcase.visual_crossing.api_key, "api-key");
        assert_eq!(testcase.visual_crossing.unit_group, "us");
        assert_eq!(testcase.ingest.fetch_days, 2);
        assert_eq!(testcase.ingest.lookback_days, 14);
        assert_eq!(testcase.locations.len(), 2);
        assert_eq!(testcase.locations[0].alias, "kungsbacka");
        assert_eq!(testcase.locations[0].tz, "Europe/Stockholm");
        assert_eq!(testcase.locations[1].alias, "boise_id");
        assert_eq!(testcase.locations[1].tz, "UTC");
        assert!(testcase.validate().is_ok());
    }

    #[test]
    fn validate() {
        macro_rules! config {
            ($document:expr) => {
                Config::try_from($document).unwrap()
            };
        }
        let good = r#"
            [visual-crossing]
            api-key = "a-real-key"
            [[locations]]
            name = "Kungsbacka"
            "#;
        assert!(config!(good).validate().is_ok());

        // the default key is a placeholder
        let testcase = config!(
            r#"
            [visual-crossing]
            api-key = "API_KEY"
            [[locations]]
            name = "Kungsbacka"
            "#
        );
        let error = testcase.validate().unwrap_err();
        assert_eq!(error.kind(), crate::ErrorKind::Config);

        // no locations
        let testcase = config!(
            r#"
            [visual-crossing]
            api-key = "a-real-key"
            "#
        );
        assert!(testcase.validate().is_err());

        // duplicate aliases
        let testcase = config!(
            r#"
            [visual-crossing]
            api-key = "a-real-key"
            [[locations]]
            name = "Kungsbacka"
            [[locations]]
            name = "kungsbacka"
            "#
        );
        assert!(testcase.validate().is_err());

        // bad timezone
        let testcase = config!(
            r#"
            [visual-crossing]
            api-key = "a-real-key"
            [[locations]]
            name = "Kungsbacka"
            timezone = "Sweden/Kungsbacka"
            "#
        );
        assert!(testcase.validate().is_err());

        // out of bounds windows
        let testcase = config!(
            r#"
            [visual-crossing]
            api-key = "a-real-key"
            [ingest]
            lookback-days = 1000
            [[locations]]
            name = "Kungsbacka"
            "#
        );
        assert!(testcase.validate().is_err());

        // bad unit group
        let testcase = config!(
            r#"
            [visual-crossing]
            api-key = "a-real-key"
            unit-group = "imperial"
            [[locations]]
            name = "Kungsbacka"
            "#
        );
        assert!(testcase.validate().is_err());
    }
}

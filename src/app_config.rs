use config::Config;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    switch: Switch,
    output: Output,
}

impl AppConfig {
    pub fn load() -> Self {
        Config::builder()
            .add_source(config::File::with_name("config").required(true))
            .add_source(config::File::with_name("config_local").required(false))
            .add_source(config::Environment::default())
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    pub fn switch(&self) -> &Switch {
        &self.switch
    }

    pub fn output(&self) -> &Output {
        &self.output
    }
}

#[derive(Debug, Deserialize)]
pub struct Switch {
    url: String,
    username: String,
    password: String,
}

impl Switch {
    /// Management UI base URL, including the trailing `/`.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

#[derive(Debug, Deserialize)]
pub struct Output {
    file: String,
}

impl Output {
    pub fn file(&self) -> &str {
        &self.file
    }
}

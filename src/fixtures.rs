//! Test fixtures: small accidents CSVs written to a temp directory.

use crate::constants::input;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

/// One raw input row; unspecified fields get plausible defaults
#[derive(Debug, Clone)]
pub struct AccidentRow {
    pub id: String,
    pub severity: String,
    pub state: String,
    pub start_time: String,
    pub city: String,
    pub weather: String,
    pub crossing: bool,
    pub junction: bool,
    pub traffic_signal: bool,
}

impl AccidentRow {
    pub fn new(id: &str, severity: &str, state: &str, start_time: &str) -> Self {
        Self {
            id: id.to_string(),
            severity: severity.to_string(),
            state: state.to_string(),
            start_time: start_time.to_string(),
            city: "Springfield".to_string(),
            weather: "Clear".to_string(),
            crossing: false,
            junction: false,
            traffic_signal: false,
        }
    }

    pub fn city(mut self, city: &str) -> Self {
        self.city = city.to_string();
        self
    }

    pub fn weather(mut self, weather: &str) -> Self {
        self.weather = weather.to_string();
        self
    }

    pub fn crossing(mut self) -> Self {
        self.crossing = true;
        self
    }

    pub fn junction(mut self) -> Self {
        self.junction = true;
        self
    }

    pub fn traffic_signal(mut self) -> Self {
        self.traffic_signal = true;
        self
    }

    fn field(&self, header: &str) -> String {
        let flag = |on: bool| if on { "True" } else { "False" }.to_string();
        match header {
            input::ID => self.id.clone(),
            input::SEVERITY => self.severity.clone(),
            input::START_TIME => self.start_time.clone(),
            input::END_TIME => self.start_time.clone(),
            input::START_LAT => "34.05".to_string(),
            input::START_LNG => "-118.24".to_string(),
            input::DISTANCE => "0.5".to_string(),
            input::SUNRISE_SUNSET => "Day".to_string(),
            input::STREET => "Main St".to_string(),
            input::CITY => self.city.clone(),
            input::COUNTY => "Central".to_string(),
            input::STATE => self.state.clone(),
            input::ZIPCODE => "90001".to_string(),
            input::COUNTRY => "US".to_string(),
            input::TIMEZONE => "US/Pacific".to_string(),
            input::CROSSING => flag(self.crossing),
            input::JUNCTION => flag(self.junction),
            input::TRAFFIC_SIGNAL => flag(self.traffic_signal),
            input::TEMPERATURE => "61.0".to_string(),
            input::HUMIDITY => "80.0".to_string(),
            input::PRESSURE => "29.9".to_string(),
            input::VISIBILITY => "10.0".to_string(),
            input::WIND_DIRECTION => "SW".to_string(),
            input::WIND_SPEED => "5.0".to_string(),
            input::PRECIPITATION => "".to_string(),
            input::WEATHER_CONDITION => self.weather.clone(),
            input::DESCRIPTION => "Accident on Main St".to_string(),
            _ => "False".to_string(),
        }
    }
}

/// Write `rows` under the full expected header and return the file path
pub fn write_accidents_csv(temp_dir: &TempDir, rows: &[AccidentRow]) -> PathBuf {
    write_csv_with_header(temp_dir, input::EXPECTED, rows)
}

/// Write `rows` under an arbitrary header; unknown headers get defaults
pub fn write_csv_with_header(temp_dir: &TempDir, header: &[&str], rows: &[AccidentRow]) -> PathBuf {
    let path = temp_dir.path().join("US_Accidents.csv");
    let mut file = File::create(&path).unwrap();

    writeln!(file, "{}", header.join(",")).unwrap();
    for row in rows {
        let fields: Vec<String> = header.iter().map(|h| row.field(h)).collect();
        writeln!(file, "{}", fields.join(",")).unwrap();
    }

    path
}

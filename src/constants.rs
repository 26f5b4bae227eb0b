//! Application constants for the accidents processor
//!
//! Input header names, canonical column names, summary table names and
//! the default thresholds used throughout the pipeline.

// =============================================================================
// Input Columns
// =============================================================================

/// Input header names as they appear in the US Accidents CSV
pub mod input {
    pub const ID: &str = "ID";
    pub const SEVERITY: &str = "Severity";
    pub const START_TIME: &str = "Start_Time";
    pub const END_TIME: &str = "End_Time";
    pub const START_LAT: &str = "Start_Lat";
    pub const START_LNG: &str = "Start_Lng";
    pub const DISTANCE: &str = "Distance(mi)";
    pub const SUNRISE_SUNSET: &str = "Sunrise_Sunset";
    pub const STREET: &str = "Street";
    pub const CITY: &str = "City";
    pub const COUNTY: &str = "County";
    pub const STATE: &str = "State";
    pub const ZIPCODE: &str = "Zipcode";
    pub const COUNTRY: &str = "Country";
    pub const TIMEZONE: &str = "Timezone";

    pub const BUMP: &str = "Bump";
    pub const CROSSING: &str = "Crossing";
    pub const GIVE_WAY: &str = "Give_Way";
    pub const JUNCTION: &str = "Junction";
    pub const STOP: &str = "Stop";
    pub const NO_EXIT: &str = "No_Exit";
    pub const TRAFFIC_SIGNAL: &str = "Traffic_Signal";
    pub const TURNING_LOOP: &str = "Turning_Loop";

    pub const TEMPERATURE: &str = "Temperature(F)";
    pub const HUMIDITY: &str = "Humidity(%)";
    pub const PRESSURE: &str = "Pressure(in)";
    pub const VISIBILITY: &str = "Visibility(mi)";
    pub const WIND_DIRECTION: &str = "Wind_Direction";
    pub const WIND_SPEED: &str = "Wind_Speed(mph)";
    pub const PRECIPITATION: &str = "Precipitation(in)";
    pub const WEATHER_CONDITION: &str = "Weather_Condition";

    pub const DESCRIPTION: &str = "Description";

    /// Every column the input must carry, in the dataset's header order
    pub const EXPECTED: &[&str] = &[
        ID,
        SEVERITY,
        START_TIME,
        END_TIME,
        START_LAT,
        START_LNG,
        DISTANCE,
        SUNRISE_SUNSET,
        STREET,
        CITY,
        COUNTY,
        STATE,
        ZIPCODE,
        COUNTRY,
        TIMEZONE,
        BUMP,
        CROSSING,
        GIVE_WAY,
        JUNCTION,
        STOP,
        NO_EXIT,
        TRAFFIC_SIGNAL,
        TURNING_LOOP,
        TEMPERATURE,
        HUMIDITY,
        PRESSURE,
        VISIBILITY,
        WIND_DIRECTION,
        WIND_SPEED,
        PRECIPITATION,
        WEATHER_CONDITION,
        DESCRIPTION,
    ];
}

// =============================================================================
// Canonical Dataset Columns
// =============================================================================

/// Column names of the normalized, row-level dataset
pub mod columns {
    pub const ID: &str = "id";
    pub const SEVERITY: &str = "severity";
    pub const SEVERITY_LABEL: &str = "severity_label";
    pub const START_TIME: &str = "start_time";
    pub const END_TIME: &str = "end_time";
    pub const START_LAT: &str = "start_lat";
    pub const START_LNG: &str = "start_lng";
    pub const DISTANCE_MI: &str = "distance_mi";
    pub const SUNRISE_SUNSET: &str = "sunrise_sunset";
    pub const STATE: &str = "state";
    pub const STATE_NAME: &str = "state_name";
    pub const CITY: &str = "city";
    pub const COUNTY: &str = "county";
    pub const ZIPCODE: &str = "zipcode";
    pub const TIMEZONE: &str = "timezone";

    pub const TEMPERATURE_F: &str = "temperature_f";
    pub const HUMIDITY_PCT: &str = "humidity_pct";
    pub const PRESSURE_IN: &str = "pressure_in";
    pub const VISIBILITY_MI: &str = "visibility_mi";
    pub const WIND_DIRECTION: &str = "wind_direction";
    pub const WIND_SPEED_MPH: &str = "wind_speed_mph";
    pub const PRECIPITATION_IN: &str = "precipitation_in";
    pub const WEATHER_CONDITION: &str = "weather_condition";

    pub const YEAR: &str = "year";
    pub const MONTH: &str = "month";
    pub const WEEKDAY: &str = "weekday";
    pub const WEEKDAY_NAME: &str = "weekday_name";
    pub const HOUR: &str = "hour";
    pub const QUARTER: &str = "quarter";
    pub const YEAR_QUARTER: &str = "year_quarter";

    pub const ACCIDENT_COUNT: &str = "accident_count";
    pub const PERCENTAGE: &str = "percentage";
    pub const RANK: &str = "rank";

    /// Wide-form severity count columns, lowest severity first
    pub const LOW: &str = "low";
    pub const MEDIUM: &str = "medium";
    pub const HIGH: &str = "high";
    pub const CRITICAL: &str = "critical";
}

/// Road-feature flags: (input header, canonical column)
pub const ROAD_FEATURES: &[(&str, &str)] = &[
    (input::BUMP, "bump"),
    (input::CROSSING, "crossing"),
    (input::GIVE_WAY, "give_way"),
    (input::JUNCTION, "junction"),
    (input::STOP, "stop"),
    (input::NO_EXIT, "no_exit"),
    (input::TRAFFIC_SIGNAL, "traffic_signal"),
    (input::TURNING_LOOP, "turning_loop"),
];

/// Numeric measurement columns: (input header, canonical column)
pub const NUMERIC_FIELDS: &[(&str, &str)] = &[
    (input::START_LAT, columns::START_LAT),
    (input::START_LNG, columns::START_LNG),
    (input::DISTANCE, columns::DISTANCE_MI),
    (input::TEMPERATURE, columns::TEMPERATURE_F),
    (input::HUMIDITY, columns::HUMIDITY_PCT),
    (input::PRESSURE, columns::PRESSURE_IN),
    (input::VISIBILITY, columns::VISIBILITY_MI),
    (input::WIND_SPEED, columns::WIND_SPEED_MPH),
    (input::PRECIPITATION, columns::PRECIPITATION_IN),
];

/// Free-text columns carried through as trimmed, nullable strings
pub const TEXT_FIELDS: &[(&str, &str)] = &[
    (input::CITY, columns::CITY),
    (input::COUNTY, columns::COUNTY),
    (input::ZIPCODE, columns::ZIPCODE),
    (input::TIMEZONE, columns::TIMEZONE),
    (input::SUNRISE_SUNSET, columns::SUNRISE_SUNSET),
    (input::WIND_DIRECTION, columns::WIND_DIRECTION),
    (input::WEATHER_CONDITION, columns::WEATHER_CONDITION),
];

// =============================================================================
// Summary Table Names
// =============================================================================

pub mod tables {
    pub const STATE_COUNTS: &str = "state_counts";
    pub const STATE_CHOROPLETH_COUNTS: &str = "state_choropleth_counts";
    pub const SEVERITY_COUNTS: &str = "severity_counts";
    pub const WEATHER_SEVERITY_COUNTS: &str = "weather_severity_counts";
    pub const WEATHER_CONDITION_COUNTS: &str = "weather_condition_counts";
    pub const ROAD_CONDITIONS_BY_SEVERITY: &str = "road_conditions_by_severity";
    pub const STATE_YEARLY_COUNTS: &str = "state_yearly_counts";
    pub const STATE_YEARLY_SEVERITY: &str = "state_yearly_severity";
    pub const STATE_YEARLY_SUMMARY: &str = "state_yearly_summary";
    pub const CITY_COUNTS_TOP_N: &str = "city_counts_topN";
    pub const ACCIDENTS_BY_YEAR: &str = "accidents_by_year";
    pub const ACCIDENTS_BY_YEAR_SEVERITY: &str = "accidents_by_year_severity";
    pub const ACCIDENTS_BY_YEAR_MONTH: &str = "accidents_by_year_month";
    pub const ACCIDENTS_BY_MONTH: &str = "accidents_by_month";
    pub const ACCIDENTS_BY_WEEKDAY: &str = "accidents_by_weekday";
    pub const ACCIDENTS_BY_HOUR: &str = "accidents_by_hour";
    pub const SEVERITY_BY_HOUR: &str = "severity_by_hour";
    pub const STATE_MONTHLY_COUNTS: &str = "state_monthly_counts";
    pub const STATE_WEEKDAY_COUNTS: &str = "state_weekday_counts";
    pub const STATE_HOURLY_COUNTS: &str = "state_hourly_counts";
    pub const TOP_STATES_BY_QUARTER: &str = "top_states_by_quarter";
    pub const STATE_YEAR_QUARTER_SEVERITY: &str = "state_year_quarter_severity";
}

/// File extension used by the summary table store
pub const TABLE_FILE_EXTENSION: &str = "parquet";

// =============================================================================
// Defaults
// =============================================================================

/// Default number of states kept per year-quarter
pub const DEFAULT_TOP_STATES_PER_QUARTER: usize = 10;

/// Default number of cities kept in the city ranking
pub const DEFAULT_TOP_CITIES: usize = 200;

/// Default output directory for summary tables
pub const DEFAULT_OUTPUT_DIR: &str = "analytics";

/// Years a year selection may name; the dataset starts in 2016
pub const SELECTABLE_YEARS: std::ops::RangeInclusive<i32> = 1900..=2100;

/// Number of rejected-row examples logged at warn level before going quiet
pub const MAX_REJECTION_WARNINGS: usize = 5;

/// Weekday names indexed by the 0 = Monday convention
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

// =============================================================================
// Environment Variables
// =============================================================================

pub mod env {
    pub const SOURCE: &str = "ACCIDENTS_SOURCE";
    pub const OUTPUT: &str = "ACCIDENTS_OUTPUT";
    pub const YEARS: &str = "ACCIDENTS_YEARS";
    pub const TOP_STATES: &str = "ACCIDENTS_TOP_STATES";
    pub const TOP_CITIES: &str = "ACCIDENTS_TOP_CITIES";
}

//! Configuration schema of the e-paper weather display.
//!
//! The schema is compiled in: every field, its kind, legal members of enumerations and defaults
//! are defined as statics. [`SCHEMA`] ties them together with the cross-field rules.

use crate::{
    metadata::{
        ConfigSchema, DefineStyle, EnumMetadata, EnumVariant, FieldKind, FieldMetadata, Literal,
    },
    validation::RequiredWhen,
};

/// Name of the flag switching unit defaults between imperial and metric.
pub const USE_IMPERIAL_UNITS: &str = "useImperialUnitsAsDefault";

/// Members of the `EpdPanel` enumeration.
pub static EPD_PANEL: EnumMetadata = EnumMetadata {
    name: "EpdPanel",
    help: "E-Paper panel type",
    variants: &[
        EnumVariant::new("DISP_BW_V2", "DISP_BW_V2")
            .help("7.5in e-Paper (v2) 800x480px Black/White"),
        EnumVariant::new("DISP_3C_B", "DISP_3C_B")
            .help("7.5in e-Paper (B) 800x480px Red/Black/White"),
        EnumVariant::new("DISP_7C_F", "DISP_7C_F").help("7.3in ACeP e-Paper (F) 800x480px 7-Colors"),
        EnumVariant::new("DISP_BW_V1", "DISP_BW_V1")
            .help("7.5in e-Paper (v1) 640x384px Black/White"),
    ],
};

/// Members of the `EpdDriver` enumeration.
pub static EPD_DRIVER: EnumMetadata = EnumMetadata {
    name: "EpdDriver",
    help: "E-Paper driver board",
    variants: &[
        EnumVariant::new("DESPI_C02", "Good Display DESPI-C02")
            .help("The only officially supported driver board"),
        EnumVariant::new("WAVESHARE", "Waveshare")
            .help("Waveshare rev2.2 / rev2.3; deprecated"),
    ],
};

/// Members of the `Sensor` enumeration.
pub static SENSOR: EnumMetadata = EnumMetadata {
    name: "Sensor",
    help: "Indoor environment sensor",
    variants: &[
        EnumVariant::new("BME280", "BME280"),
        EnumVariant::new("BME680", "BME680"),
    ],
};

/// Members of the `WeatherApi` enumeration.
pub static WEATHER_API: EnumMetadata = EnumMetadata {
    name: "WeatherApi",
    help: "Weather data provider",
    variants: &[
        EnumVariant::new("OPEN_WEATHER_MAP", "OpenWeatherMap").help("Requires an API key"),
        EnumVariant::new("OPEN_METEO", "Open-Meteo"),
    ],
};

/// Members of the `UnitsTemp` enumeration.
pub static UNITS_TEMP: EnumMetadata = EnumMetadata {
    name: "UnitsTemp",
    help: "Temperature units",
    variants: &[
        EnumVariant::new("KELVIN", "Kelvin"),
        EnumVariant::new("CELSIUS", "Celsius"),
        EnumVariant::new("FAHRENHEIT", "Fahrenheit"),
    ],
};

/// Members of the `UnitsSpeed` enumeration.
pub static UNITS_SPEED: EnumMetadata = EnumMetadata {
    name: "UnitsSpeed",
    help: "Wind speed units",
    variants: &[
        EnumVariant::new("METERSPERSECOND", "m/s"),
        EnumVariant::new("FEETPERSECOND", "ft/s"),
        EnumVariant::new("KILOMETERSPERHOUR", "km/h"),
        EnumVariant::new("MILESPERHOUR", "mph"),
        EnumVariant::new("KNOTS", "kt"),
        EnumVariant::new("BEAUFORT", "Beaufort"),
    ],
};

/// Members of the `UnitsPres` enumeration.
pub static UNITS_PRES: EnumMetadata = EnumMetadata {
    name: "UnitsPres",
    help: "Atmospheric pressure units",
    variants: &[
        EnumVariant::new("HECTOPASCAL", "hPa"),
        EnumVariant::new("PASCAL", "Pa"),
        EnumVariant::new("MILLIMETERSOFMERCURY", "mmHg"),
        EnumVariant::new("INCHESOFMERCURY", "inHg"),
        EnumVariant::new("MILLIBAR", "mbar"),
        EnumVariant::new("ATMOSPHERE", "atm"),
        EnumVariant::new("GRAMSPERSQUARECENTIMETER", "gsc"),
        EnumVariant::new("POUNDSPERSQUAREINCH", "psi"),
    ],
};

/// Members of the `UnitsDistance` enumeration.
pub static UNITS_DISTANCE: EnumMetadata = EnumMetadata {
    name: "UnitsDistance",
    help: "Distance units",
    variants: &[
        EnumVariant::new("KILOMETERS", "km"),
        EnumVariant::new("MILES", "mile"),
    ],
};

/// Members of the `UnitsPrecip` enumeration.
pub static UNITS_PRECIP: EnumMetadata = EnumMetadata {
    name: "UnitsPrecip",
    help: "Precipitation units",
    variants: &[
        EnumVariant::new("POP", "probability of precipitation"),
        EnumVariant::new("MILLIMETERS", "mm"),
        EnumVariant::new("CENTIMETERS", "cm"),
        EnumVariant::new("INCHES", "in"),
    ],
};

/// Members of the `WindDirectionLabel` enumeration.
pub static WIND_DIRECTION_LABEL: EnumMetadata = EnumMetadata {
    name: "WindDirectionLabel",
    help: "Wind direction label: a number or Compass Point Notation",
    variants: &[
        EnumVariant::new("WIND_HIDDEN", "hidden"),
        EnumVariant::new("NUMBER", "number"),
        EnumVariant::new("CARDINAL", "cardinal").help("4 points, e.g. E"),
        EnumVariant::new("INTERCARDINAL", "intercardinal").help("8 points, e.g. NE"),
        EnumVariant::new("SECONDARY_INTERCARDINAL", "secondary intercardinal")
            .help("16 points, e.g. NNE"),
        EnumVariant::new("TERTIARY_INTERCARDINAL", "tertiary intercardinal")
            .help("32 points, e.g. NbE"),
    ],
};

/// Members of the `WindArrowPrecision` enumeration.
pub static WIND_ARROW_PRECISION: EnumMetadata = EnumMetadata {
    name: "WindArrowPrecision",
    help: "Precision of the wind direction arrow",
    variants: &[
        EnumVariant::new("WIND_HIDDEN", "hidden"),
        EnumVariant::new("CARDINAL", "cardinal").help("4 icons, 288B of flash"),
        EnumVariant::new("INTERCARDINAL", "intercardinal").help("8 icons, 576B of flash"),
        EnumVariant::new("SECONDARY_INTERCARDINAL", "secondary intercardinal")
            .help("16 icons, 1,152B of flash"),
        EnumVariant::new("TERTIARY_INTERCARDINAL", "tertiary intercardinal")
            .help("32 icons, 2,304B of flash"),
        EnumVariant::new("ANY_360", "360 deg").help("360 icons, 25,920B of flash"),
    ],
};

/// Members of the `DisplayDailyPrecip` enumeration.
pub static DISPLAY_DAILY_PRECIP: EnumMetadata = EnumMetadata {
    name: "DisplayDailyPrecip",
    help: "Daily precipitation shown under the high / low temperatures",
    variants: &[
        EnumVariant::new("PRECIP_DISABLED", "disabled").help("Always hidden"),
        EnumVariant::new("PRECIP_ENABLED", "enabled").help("Always shown"),
        EnumVariant::new("PRECIP_SMART", "smart")
            .help("Shown only when precipitation is forecasted"),
    ],
};

/// Members of the `Locale` enumeration.
pub static LOCALE: EnumMetadata = EnumMetadata {
    name: "Locale",
    help: "Display language and formatting locale",
    variants: &[
        EnumVariant::new("DE_DE", "de_DE"),
        EnumVariant::new("EN_GB", "en_GB"),
        EnumVariant::new("EN_US", "en_US"),
        EnumVariant::new("ET_EE", "et_EE"),
        EnumVariant::new("FI_FI", "fi_FI"),
        EnumVariant::new("FR_FR", "fr_FR"),
        EnumVariant::new("IT_IT", "it_IT"),
        EnumVariant::new("NL_BE", "nl_BE"),
        EnumVariant::new("PT_BR", "pt_BR"),
        EnumVariant::new("ES_ES", "es_ES"),
    ],
};

/// Members of the `Font` enumeration.
pub static FONT: EnumMetadata = EnumMetadata {
    name: "Font",
    help: "Display typeface",
    variants: &[
        EnumVariant::new("FREEMONO", "FreeMono"),
        EnumVariant::new("FREESANS", "FreeSans"),
        EnumVariant::new("FREESERIF", "FreeSerif"),
        EnumVariant::new("LATO", "Lato"),
        EnumVariant::new("NONTSERRAT", "Montserrat"),
        EnumVariant::new("OPEN_SANS", "Open Sans"),
        EnumVariant::new("POPPINS", "Poppins"),
        EnumVariant::new("QUICKSAND", "Quicksand"),
        EnumVariant::new("RALEWAY", "Raleway"),
        EnumVariant::new("ROBOTO", "Roboto"),
        EnumVariant::new("ROBOTO_MONO", "Roboto Mono"),
        EnumVariant::new("ROBOTO_SLAB", "Roboto Slab"),
        EnumVariant::new("UBUNTU", "Ubuntu"),
        EnumVariant::new("UBUNTU_MONO", "Ubuntu Mono"),
    ],
};

const fn int_field(name: &'static str, default: i64) -> FieldMetadata {
    FieldMetadata::new(name, FieldKind::Integer).default_to(Literal::Integer(default))
}

const fn bool_field(name: &'static str, default: bool) -> FieldMetadata {
    FieldMetadata::new(name, FieldKind::Bool).default_to(Literal::Bool(default))
}

const fn unit_field(
    name: &'static str,
    meta: &'static EnumMetadata,
    imperial: &'static str,
    metric: &'static str,
) -> FieldMetadata {
    FieldMetadata::new(name, FieldKind::Enum(meta)).default_if(
        USE_IMPERIAL_UNITS,
        Literal::Enum(imperial),
        Literal::Enum(metric),
    )
}

static FIELDS: &[FieldMetadata] = &[
    FieldMetadata::new("epdPanel", FieldKind::Enum(&EPD_PANEL))
        .default_to(Literal::Enum("DISP_BW_V2")),
    FieldMetadata::new("epdDriver", FieldKind::Enum(&EPD_DRIVER))
        .default_to(Literal::Enum("DESPI_C02")),
    FieldMetadata::new("sensor", FieldKind::Enum(&SENSOR)).default_to(Literal::Enum("BME280")),
    FieldMetadata::new("locale", FieldKind::Enum(&LOCALE)).define(DefineStyle::WireValue),
    FieldMetadata::new("weatherAPI", FieldKind::Enum(&WEATHER_API))
        .default_to(Literal::Enum("OPEN_WEATHER_MAP")),
    bool_field(USE_IMPERIAL_UNITS, false)
        .help("Selects imperial units for all unit fields that are not set explicitly"),
    unit_field("unitsTemp", &UNITS_TEMP, "FAHRENHEIT", "CELSIUS"),
    unit_field("unitsSpeed", &UNITS_SPEED, "MILESPERHOUR", "KILOMETERSPERHOUR"),
    unit_field("unitsPres", &UNITS_PRES, "INCHESOFMERCURY", "MILLIBAR"),
    unit_field("unitsDistance", &UNITS_DISTANCE, "MILES", "KILOMETERS"),
    FieldMetadata::new("unitsHourlyPrecip", FieldKind::Enum(&UNITS_PRECIP))
        .default_to(Literal::Enum("POP"))
        .help("Hourly precipitation: probability of precipitation or hourly volume"),
    unit_field("unitsDailyPrecip", &UNITS_PRECIP, "INCHES", "MILLIMETERS")
        .help("Daily precipitation: probability of precipitation or daily volume"),
    FieldMetadata::new("windDirectionLabel", FieldKind::Enum(&WIND_DIRECTION_LABEL))
        .default_to(Literal::Enum("WIND_HIDDEN")),
    FieldMetadata::new("windArrowPrecision", FieldKind::Enum(&WIND_ARROW_PRECISION))
        .default_to(Literal::Enum("SECONDARY_INTERCARDINAL")),
    FieldMetadata::new("font", FieldKind::Enum(&FONT))
        .default_to(Literal::Enum("FREESANS"))
        .define(DefineStyle::FontHeader)
        .help("The display layout is designed around FreeSans; other fonts may cause spacing artifacts"),
    FieldMetadata::new("displayDailyPrecip", FieldKind::Enum(&DISPLAY_DAILY_PRECIP))
        .default_to(Literal::Enum("PRECIP_SMART")),
    bool_field("displayHourlyIcons", true)
        .help("Weather icons drawn on the temperature and precipitation chart"),
    bool_field("displayAlerts", true),
    bool_field("statusBarExtrasBatPercentage", true),
    bool_field("statusBarExtrasBatVoltage", false),
    bool_field("statusBarExtrasWifiStrength", true),
    bool_field("statusBarExtrasWifiRSSI", false),
    bool_field("batteryMonitoring", true)
        .help("Disable if the display is powered without a battery"),
    int_field("debugLevel", 0).help(
        "0: basic status information; 1: increased verbosity; 2: print API responses to serial",
    ),
    int_field("pinBatAdc", 34),
    int_field("pinEpdBusy", 14),
    int_field("pinEpdCS", 13),
    int_field("pinEpdRst", 21),
    int_field("pinEpdDC", 22),
    int_field("pinEpdSCK", 18),
    int_field("pinEpdMISO", 19),
    int_field("pinEpdMOSI", 23),
    int_field("pinEpdPwr", 26),
    int_field("pinBmeSDA", 17),
    int_field("pinBmeSCL", 16),
    int_field("pinBmePwr", 4),
    FieldMetadata::new("bmeAddress", FieldKind::StringOrInteger)
        .default_to(Literal::Integer(0x76))
        .help("I2C address of the BME sensor"),
    FieldMetadata::new("wifiSSID", FieldKind::String),
    FieldMetadata::new("wifiPassword", FieldKind::String).secret(),
    FieldMetadata::new("owmApikey", FieldKind::OptionalString)
        .default_to(Literal::Null)
        .secret()
        .help("OpenWeatherMap API key"),
    FieldMetadata::new("owmOnecallVersion", FieldKind::String).default_to(Literal::Str("3.0")),
    FieldMetadata::new("latitude", FieldKind::String),
    FieldMetadata::new("longitude", FieldKind::String),
    FieldMetadata::new("city", FieldKind::String),
    FieldMetadata::new("timezone", FieldKind::String).help("POSIX time zone string"),
    FieldMetadata::new("timeFormat", FieldKind::String).default_to(Literal::Str("%H:%M")),
    FieldMetadata::new("hourFormat", FieldKind::String).default_to(Literal::Str("%H")),
    FieldMetadata::new("dateFormat", FieldKind::String),
    FieldMetadata::new("refreshTimeFormat", FieldKind::String)
        .default_to(Literal::Str("%x %H:%M")),
    int_field("sleepDuration", 30).help("Minutes between refreshes"),
    int_field("bedTime", 0).help("Hour at which refreshes are paused"),
    int_field("wakeTime", 6).help("Hour at which refreshes are resumed"),
    int_field("hourlyGraphMax", 24).help("Number of hours shown on the outlook graph"),
];

static OWM_APIKEY_RULE: RequiredWhen = RequiredWhen {
    field: "owmApikey",
    when_field: "weatherAPI",
    equals: "OPEN_WEATHER_MAP",
};

/// Schema of the weather display configuration.
pub static SCHEMA: ConfigSchema = ConfigSchema {
    fields: FIELDS,
    exported_enums: &[
        &EPD_PANEL,
        &EPD_DRIVER,
        &SENSOR,
        &WEATHER_API,
        &UNITS_TEMP,
        &UNITS_SPEED,
        &UNITS_PRES,
        &UNITS_DISTANCE,
        &UNITS_PRECIP,
        &WIND_DIRECTION_LABEL,
        &WIND_ARROW_PRECISION,
        &DISPLAY_DAILY_PRECIP,
    ],
    validations: &[&OWM_APIKEY_RULE],
};

//! Integration tests for printing help and debug info.

use anstream::AutoStream;
use epd_config::{Json, RawDocument, ResolveError, Yaml, metadata::FieldMetadata, schema::SCHEMA};
use epd_config_commands::Printer;
use test_casing::test_casing;

fn json_source(filename: &str, json: serde_json::Value) -> Json {
    let serde_json::Value::Object(object) = json else {
        panic!("expected an object, got {json:?}");
    };
    Json::new(filename, object)
}

fn base_config() -> serde_json::Value {
    serde_json::json!({
        "locale": "en_US",
        "weatherAPI": "Open-Meteo",
        "wifiSSID": "home",
        "latitude": "58.3806",
        "longitude": "26.7251",
        "city": "Tartu",
        "timezone": "EET-2EEST,M3.5.0/3,M10.5.0/4",
        "dateFormat": "%a, %B %e",
    })
}

fn mock_document() -> RawDocument {
    let mut config = base_config();
    config["unitsTemp"] = "KELVIN".into();
    config["colourScheme"] = "dark".into();
    let secrets = serde_json::json!({ "wifiPassword": "hunter2" });
    RawDocument::new()
        .with(json_source("config.json", config))
        .with(json_source("secrets.json", secrets))
}

fn print_help(filter: impl FnMut(&FieldMetadata) -> bool) -> String {
    let mut buffer = vec![];
    Printer::custom(AutoStream::never(&mut buffer))
        .print_help(&SCHEMA, filter)
        .unwrap();
    String::from_utf8(buffer).unwrap()
}

#[test]
fn enum_field_help() {
    let help = print_help(|field| field.name == "unitsTemp");
    insta::assert_snapshot!(help, @r#"
    unitsTemp
      Type: enum UnitsTemp [input: string]
      Default: FAHRENHEIT if `useImperialUnitsAsDefault` is set, otherwise CELSIUS
      Define: UNITS_TEMP
      Members: Temperature units
      - "Kelvin" [KELVIN]
      - "Celsius" [CELSIUS]
      - "Fahrenheit" [FAHRENHEIT]
    "#);
}

#[test]
fn secret_fields_help() {
    let help = print_help(|field| field.is_secret);
    insta::assert_snapshot!(help, @r"
    wifiPassword
      Type: secret string [input: string]
      Default: none, required
      Define: D_WIFI_PASSWORD

    owmApikey
      Type: secret optional string [input: string | null]
      Default: null
      Define: D_OWM_APIKEY
      OpenWeatherMap API key
    ");
}

#[test]
fn integer_literal_field_help() {
    let help = print_help(|field| field.name == "bmeAddress");
    insta::assert_snapshot!(help, @r"
    bmeAddress
      Type: integer literal [input: integer | string]
      Default: 118
      Define: BME_ADDRESS
      I2C address of the BME sensor
    ");
}

#[test]
fn full_help() {
    let help = print_help(|_| true);
    let field_names: Vec<_> = help
        .lines()
        .filter(|line| !line.is_empty() && !line.starts_with(' '))
        .collect();
    let expected_names: Vec<_> = SCHEMA.fields.iter().map(|field| field.name).collect();
    assert_eq!(field_names, expected_names);

    assert!(help.contains("font\n  Type: enum Font [input: string]\n"), "{help}");
    assert!(help.contains("  Define: FONT_HEADER\n"), "{help}");
    assert!(help.contains("  - \"Open Sans\" [OPEN_SANS]\n"), "{help}");
}

#[test]
fn resolved_config_debug() {
    let document = mock_document();
    let mut buffer = vec![];
    let config = Printer::custom(AutoStream::never(&mut buffer))
        .print_debug(&SCHEMA, &document, |field| {
            ["unitsTemp", "unitsSpeed", "bmeAddress", "wifiPassword", "city"].contains(&field.name)
        })
        .unwrap()
        .unwrap();
    assert_eq!(config.str("wifiPassword").unwrap().expose(), "hunter2");

    let buffer = String::from_utf8(buffer).unwrap();
    insta::assert_snapshot!(buffer, @r#"
    Configuration sources:
    - JSON:config.json, 10 param(s)
    - JSON:secrets.json, 1 param(s)

    Values:
    unitsTemp = "Kelvin" [KELVIN]
      Origin: JSON:config.json -> .unitsTemp
    unitsSpeed = "km/h" [KILOMETERSPERHOUR]
      Origin: schema default -> default selected by `useImperialUnitsAsDefault`
    bmeAddress = 118
      Origin: schema default
    wifiPassword = [REDACTED]
      Origin: JSON:secrets.json -> .wifiPassword
    city = "Tartu"
      Origin: JSON:config.json -> .city

    Unknown keys:
    - colourScheme ignored; JSON:config.json -> .colourScheme
    "#);
}

#[test]
fn erroneous_config_debug() {
    let mut config = base_config();
    config["sensor"] = "BME999".into();
    config["bmeAddress"] = true.into();
    config["wifiPassword"] = "hunter2".into();
    config.as_object_mut().unwrap().remove("city");
    let document = RawDocument::new().with(json_source("config.json", config));

    let mut buffer = vec![];
    let err = Printer::custom(AutoStream::never(&mut buffer))
        .print_debug(&SCHEMA, &document, |field| {
            ["epdPanel", "sensor", "bmeAddress", "wifiPassword", "city"].contains(&field.name)
        })
        .unwrap()
        .unwrap_err();
    let ResolveError::Fields(errors) = &err else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(errors.len(), 3);

    let buffer = String::from_utf8(buffer).unwrap();
    insta::assert_snapshot!(buffer, @r#"
    Configuration sources:
    - JSON:config.json, 10 param(s)

    Values:
    sensor = "BME999"
      Origin: JSON:config.json -> .sensor
      Error: unknown value "BME999", expected one of "BME280", "BME680"
    bmeAddress = true
      Origin: JSON:config.json -> .bmeAddress
      Error: invalid type: true, expected integer | string
    wifiPassword = [REDACTED]
      Origin: JSON:config.json -> .wifiPassword
    city
      Error: missing required field
    "#);
}

#[test]
fn violated_rule_debug() {
    let mut config = base_config();
    config["weatherAPI"] = "OpenWeatherMap".into();
    config["wifiPassword"] = "hunter2".into();
    let yaml = Yaml::new("secrets.yml", serde_yaml::from_str("owmApikey: null").unwrap()).unwrap();
    let document = RawDocument::new()
        .with(json_source("config.json", config))
        .with(yaml);

    let mut buffer = vec![];
    let err = Printer::custom(AutoStream::never(&mut buffer))
        .print_debug(&SCHEMA, &document, |field| {
            field.name == "weatherAPI" || field.name == "owmApikey"
        })
        .unwrap()
        .unwrap_err();
    assert!(matches!(&err, ResolveError::Validation(violations) if violations.len() == 1));

    let buffer = String::from_utf8(buffer).unwrap();
    insta::assert_snapshot!(buffer, @r#"
    Configuration sources:
    - JSON:config.json, 9 param(s)
    - YAML:secrets.yml, 1 param(s)

    Values:
    weatherAPI = "OpenWeatherMap"
      Origin: JSON:config.json -> .weatherAPI
    owmApikey = null
      Origin: YAML:secrets.yml -> .owmApikey

    Cross-field rules:
    - Error: missing required combination: owmApikey required for weatherAPI `OpenWeatherMap`
    "#);
}

#[test]
fn empty_config_debug() {
    let mut buffer = vec![];
    let err = Printer::custom(AutoStream::never(&mut buffer))
        .print_debug(&SCHEMA, &RawDocument::new(), |field| field.name == "locale")
        .unwrap()
        .unwrap_err();
    assert!(matches!(&err, ResolveError::Fields(errors) if errors.len() == 8));

    let buffer = String::from_utf8(buffer).unwrap();
    insta::assert_snapshot!(buffer, @r"
    configuration is empty

    Values:
    locale
      Error: missing required field
    ");
}

#[derive(Debug, Clone, Copy)]
enum Format {
    Json,
    Yaml,
}

#[test_casing(2, [Format::Json, Format::Yaml])]
#[test]
fn dumping_resolved_config(format: Format) {
    let config = epd_config::resolve(&mock_document()).unwrap();
    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(json["wifiPassword"], "[REDACTED]");

    let mut buffer = vec![];
    let mut printer = Printer::custom(AutoStream::never(&mut buffer));
    match format {
        Format::Json => printer.print_json(&json).unwrap(),
        Format::Yaml => printer.print_yaml(&json).unwrap(),
    }
    drop(printer);

    let restored: serde_json::Value = match format {
        Format::Json => serde_json::from_slice(&buffer).unwrap(),
        Format::Yaml => serde_yaml::from_slice(&buffer).unwrap(),
    };
    assert_eq!(restored, json);

    // The dump is a valid config on its own, except for the redacted password.
    let serde_json::Value::Object(object) = restored else {
        panic!("unexpected dump: {restored:?}");
    };
    let document = RawDocument::new().with(Json::new("dump.json", object));
    let restored_config = epd_config::resolve(&document).unwrap();
    assert_eq!(restored_config.enum_value("unitsTemp"), config.enum_value("unitsTemp"));
    assert_eq!(restored_config.str("wifiPassword").unwrap().expose(), "[REDACTED]");
}

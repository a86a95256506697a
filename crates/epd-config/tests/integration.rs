//! Integration tests for `epd-config`.

use std::{fs, path::PathBuf};

use assert_matches::assert_matches;
use epd_config::{
    ParseErrorKind, RawDocument, ResolveError, ResolvedValue,
    defines::{DefineValue, Defines},
    schema::SCHEMA,
};

const CONFIG_JSON: &str = r#"{
    "epdPanel": "DISP_3C_B",
    "locale": "fi_FI",
    "weatherAPI": "Open-Meteo",
    "useImperialUnitsAsDefault": false,
    "unitsPres": "hPa",
    "windArrowPrecision": "360 deg",
    "font": "Ubuntu Mono",
    "bmeAddress": "0x77",
    "wifiSSID": "koti",
    "wifiPassword": "salasana",
    "owmApikey": null,
    "latitude": "60.1699",
    "longitude": "24.9384",
    "city": "Helsinki",
    "timezone": "EET-2EEST,M3.5.0/3,M10.5.0/4",
    "dateFormat": "%A, %e. %Bta",
    "colorScheme": "dark"
}"#;

const SECRETS_YAML: &str = "
wifiPassword: 'p@ss \"w0rd\"'
weatherAPI: OpenWeatherMap
owmApikey: deadbeef
";

fn write_file(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("epd-config-integration-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn json_config_to_defines() {
    let path = write_file("config.json", CONFIG_JSON);
    let document = RawDocument::from_file(&path).unwrap();
    let config = epd_config::resolve(&document).unwrap();

    assert_eq!(config.enum_value("epdPanel").unwrap().ordinal(), 1);
    assert_eq!(config.enum_value("unitsTemp").unwrap().name(), "CELSIUS");
    assert_eq!(config.get("owmApikey"), Some(&ResolvedValue::Null));

    let defines = Defines::from_config(&config);
    let header = defines.to_header();
    for line in [
        "#define DISP_3C_B 1",
        "#define ANY_360 5",
        "#define EPD_PANEL DISP_3C_B",
        "#define LOCALE fi_FI",
        "#define WEATHER_API OPEN_METEO",
        "#define UNITS_PRES HECTOPASCAL",
        "#define UNITS_SPEED KILOMETERSPERHOUR",
        "#define WIND_ARROW_PRECISION ANY_360",
        "#define FONT_HEADER \"fonts/UbuntuMono_R.h\"",
        "#define BME_ADDRESS 119",
        "#define D_WIFI_PASSWORD \"salasana\"",
        "#define D_OWM_APIKEY \"\"",
        "#define D_DATE_FORMAT \"%A, %e. %Bta\"",
        "#define USE_IMPERIAL_UNITS_AS_DEFAULT 0",
    ] {
        assert!(header.lines().any(|header_line| header_line == line), "{line}\n{header}");
    }
    assert!(!header.contains("COLOR_SCHEME"), "{header}");
    assert!(header.starts_with("// Generated by epd-config"), "{header}");
    assert!(header.ends_with("#endif // EPD_CONFIG_DEFINES_H\n"), "{header}");
}

#[test]
fn layered_config_with_secrets() {
    let config_path = write_file("base.json", CONFIG_JSON);
    let secrets_path = write_file("secrets.yml", SECRETS_YAML);
    let document = RawDocument::from_file(&config_path)
        .unwrap()
        .with_file(&secrets_path)
        .unwrap();
    assert_eq!(document.sources().len(), 2);

    let config = epd_config::resolve(&document).unwrap();
    assert_eq!(config.enum_value("weatherAPI").unwrap().name(), "OPEN_WEATHER_MAP");
    let password = config.str("wifiPassword").unwrap();
    assert!(password.is_secret());
    assert_eq!(password.expose(), "p@ss \"w0rd\"");

    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(json["wifiPassword"], "[REDACTED]");

    let defines = Defines::from_config(&config);
    assert_eq!(
        defines.get("D_WIFI_PASSWORD"),
        Some(&DefineValue::Str("p@ss \"w0rd\"".to_owned()))
    );
    assert!(defines.to_flags().contains("-DD_WIFI_PASSWORD=\"p@ss \\\"w0rd\\\"\"\n"));
}

#[test]
fn missing_api_key_for_openweathermap() {
    let path = write_file("no-key.json", CONFIG_JSON);
    let mut document = RawDocument::from_file(&path).unwrap();
    document.set(
        "weatherAPI",
        epd_config::value::WithOrigin::new("OpenWeatherMap".into(), Default::default()),
    );

    let err = epd_config::resolve(&document).unwrap_err();
    assert_matches!(&err, ResolveError::Validation(violations) if violations.len() == 1);
    assert!(err.to_string().contains("owmApikey required for weatherAPI"), "{err}");
}

#[test]
fn field_errors_with_origins() {
    let json = CONFIG_JSON
        .replace(r#""fi_FI""#, r#""fi_SV""#)
        .replace(r#""0x77""#, "true");
    let path = write_file("bogus.json", &json);
    let document = RawDocument::from_file(&path).unwrap();

    let err = epd_config::resolve(&document).unwrap_err();
    let ResolveError::Fields(errors) = err else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(errors.len(), 2);

    let locale_err = errors.for_field("locale").unwrap();
    assert_matches!(locale_err.kind(), ParseErrorKind::InvalidEnumValue { received, .. } if received == "fi_SV");
    let message = locale_err.to_string();
    assert!(message.contains("variable at 'locale' in JSON file"), "{message}");
    assert!(message.contains("bogus.json"), "{message}");

    let address_err = errors.for_field("bmeAddress").unwrap();
    assert_matches!(address_err.kind(), ParseErrorKind::TypeMismatch { received, .. } if received == "true");
}

#[test]
fn unquoted_yaml_password_is_not_leaked() {
    let config_path = write_file("leak-config.json", CONFIG_JSON);
    let secrets_path = write_file("leak-secrets.yml", "wifiPassword: 31415926\n");
    let document = RawDocument::from_file(&config_path)
        .and_then(|document| document.with_file(&secrets_path))
        .unwrap();

    let err = epd_config::resolve(&document).unwrap_err();
    let message = err.to_string();
    assert!(!message.contains("31415926"), "{message}");
    let ResolveError::Fields(errors) = err else {
        panic!("unexpected error: {message}");
    };
    let password_err = errors.for_field("wifiPassword").unwrap();
    assert_matches!(
        password_err.kind(),
        ParseErrorKind::TypeMismatch { received, .. } if received == "[REDACTED] integer"
    );
    assert!(password_err.to_string().contains("leak-secrets.yml"), "{password_err}");
}

#[test]
fn resolved_config_is_a_fixed_point() {
    let path = write_file("fixed-point.json", CONFIG_JSON);
    let config = epd_config::resolve(&RawDocument::from_file(&path).unwrap()).unwrap();
    let json = serde_json::Value::Object(config.to_document().to_json());
    assert_eq!(json.as_object().unwrap().len(), SCHEMA.fields.len());
    assert_eq!(json["unitsTemp"], "Celsius");
    assert_eq!(json["wifiPassword"], "salasana");

    let path = write_file("fixed-point-output.json", &json.to_string());
    let resolved_again = epd_config::resolve(&RawDocument::from_file(&path).unwrap()).unwrap();
    assert_eq!(resolved_again, config);
}

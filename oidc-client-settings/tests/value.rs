use std::collections::BTreeMap;

use oidc_client_settings::{
    ClientAuthentication, FromSettingValue, QueryParamValue, ResponseMode, SettingValue,
    SettingsError, UserInfoJwtIssuer,
};

#[test]
fn test_truthiness() {
    assert!(SettingValue::Bool(true).is_truthy());
    assert!(!SettingValue::Bool(false).is_truthy());

    assert!(SettingValue::Integer(1).is_truthy());
    assert!(SettingValue::Integer(-1).is_truthy());
    assert!(!SettingValue::Integer(0).is_truthy());

    assert!(SettingValue::Float(0.5).is_truthy());
    assert!(!SettingValue::Float(0.0).is_truthy());
    assert!(!SettingValue::Float(-0.0).is_truthy());
    assert!(!SettingValue::Float(f64::NAN).is_truthy());

    assert!(SettingValue::from("yes").is_truthy());
    assert!(SettingValue::from("false").is_truthy());
    assert!(SettingValue::from("0").is_truthy());
    assert!(!SettingValue::from("").is_truthy());

    assert!(!SettingValue::Null.is_truthy());
    assert!(SettingValue::List(vec![]).is_truthy());
    assert!(SettingValue::Map(BTreeMap::new()).is_truthy());
}

#[test]
fn test_option_conversion() {
    assert_eq!(SettingValue::from(None::<bool>), SettingValue::Null);
    assert_eq!(SettingValue::from(Some(true)), SettingValue::Bool(true));
    assert!(SettingValue::Null.is_null());
}

#[test]
fn test_to_json() {
    let mut map = BTreeMap::new();
    map.insert("a".to_string(), SettingValue::Integer(1));
    map.insert(
        "b".to_string(),
        SettingValue::List(vec![SettingValue::Bool(true), SettingValue::Null]),
    );
    assert_eq!(
        SettingValue::Map(map).to_json(),
        serde_json::json!({"a": 1, "b": [true, null]})
    );
    assert_eq!(SettingValue::Float(f64::INFINITY).to_json(), serde_json::Value::Null);
}

#[test]
fn test_from_setting_value_conversions() {
    assert_eq!(
        String::from_setting_value(&SettingValue::Integer(42), "k").unwrap(),
        "42"
    );
    assert_eq!(
        u64::from_setting_value(&SettingValue::String(" 15 ".into()), "k").unwrap(),
        15
    );
    assert!(u64::from_setting_value(&SettingValue::Bool(true), "k").is_err());
    assert_eq!(
        Option::<String>::from_setting_value(&SettingValue::Null, "k").unwrap(),
        None
    );
    assert_eq!(
        QueryParamValue::from_setting_value(&SettingValue::Float(1.5), "k").unwrap(),
        QueryParamValue::Float(1.5)
    );

    let list = SettingValue::List(vec![SettingValue::from("a"), SettingValue::Null]);
    let err = Vec::<String>::from_setting_value(&list, "items").unwrap_err();
    assert_eq!(
        err,
        SettingsError::TypeMismatch {
            key: "items[1]".into(),
            expected: "string",
        }
    );
}

#[test]
fn test_response_mode_parsing() {
    assert_eq!("query".parse::<ResponseMode>().unwrap(), ResponseMode::Query);
    assert_eq!(
        "fragment".parse::<ResponseMode>().unwrap(),
        ResponseMode::Fragment
    );
    assert_eq!(
        "form_post".parse::<ResponseMode>().unwrap_err(),
        SettingsError::InvalidResponseMode("form_post".into())
    );
    assert_eq!(ResponseMode::default(), ResponseMode::Query);
    assert_eq!(ResponseMode::Fragment.to_string(), "fragment");
}

#[test]
fn test_client_authentication_parsing() {
    assert_eq!(
        "client_secret_basic".parse::<ClientAuthentication>().unwrap(),
        ClientAuthentication::ClientSecretBasic
    );
    assert_eq!(
        ClientAuthentication::default().as_str(),
        "client_secret_post"
    );
    assert!("none".parse::<ClientAuthentication>().is_err());
}

#[test]
fn test_user_info_jwt_issuer_is_permissive() {
    assert_eq!(UserInfoJwtIssuer::from("ANY"), UserInfoJwtIssuer::Any);
    assert_eq!(UserInfoJwtIssuer::from("OP"), UserInfoJwtIssuer::Op);
    // Only the exact upper-case keywords are special.
    assert_eq!(
        UserInfoJwtIssuer::from("op"),
        UserInfoJwtIssuer::Issuer("op".into())
    );
    assert_eq!(
        UserInfoJwtIssuer::from(String::from("https://issuer.example")).to_string(),
        "https://issuer.example"
    );
    assert_eq!(UserInfoJwtIssuer::default(), UserInfoJwtIssuer::Op);
}

#[test]
fn test_query_param_serde_shape() {
    let params: BTreeMap<String, QueryParamValue> =
        serde_json::from_value(serde_json::json!({"a": "x", "b": 2, "c": false, "d": 1.5}))
            .unwrap();
    assert_eq!(params["a"], QueryParamValue::String("x".into()));
    assert_eq!(params["b"], QueryParamValue::Integer(2));
    assert_eq!(params["c"], QueryParamValue::Bool(false));
    assert_eq!(params["d"], QueryParamValue::Float(1.5));
}

#[test]
fn test_query_param_float_equality_is_bitwise() {
    assert_eq!(QueryParamValue::Float(f64::NAN), QueryParamValue::Float(f64::NAN));
    assert_ne!(QueryParamValue::Float(0.0), QueryParamValue::Float(-0.0));
    assert_ne!(QueryParamValue::Integer(1), QueryParamValue::Float(1.0));
}

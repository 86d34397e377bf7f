use super::checksum;
use super::message::Field;
use super::message::FixedField;
use super::message::Message;
use super::schema;
use super::spec;
use super::spec::ProtocolVersion;

#[test]
fn invalid_fixed_field() {
    assert_eq!(FixedField::new(&spec::FF_STATUS_CODE, "123").is_err(), true);
}

#[test]
fn ok_fixed_field() {
    assert_eq!(FixedField::new(&spec::FF_STATUS_CODE, "3").is_ok(), true);
}

#[test]
fn sc_status_message() {
    let msg = Message::new(
        &spec::M_SC_STATUS,
        vec![
            FixedField::new(&spec::FF_STATUS_CODE, "0").unwrap(),
            FixedField::new(&spec::FF_MAX_PRINT_WIDTH, "999").unwrap(),
            FixedField::new(&spec::FF_PROTOCOL_VERSION, spec::SIP_PROTOCOL_VERSION).unwrap(),
        ],
        vec![],
    );

    assert_eq!(msg.to_sip('|'), "9909992.00");
}

#[test]
fn login_message() {
    let msg = Message::new(
        &spec::M_LOGIN,
        vec![
            FixedField::new(&spec::FF_UID_ALGO, "0").unwrap(),
            FixedField::new(&spec::FF_PWD_ALGO, "0").unwrap(),
        ],
        vec![
            Field::new(spec::F_LOGIN_UID.code, "sip_username"),
            Field::new(spec::F_LOGIN_PWD.code, "sip_password"),
        ],
    );

    assert_eq!(msg.to_sip('|'), "9300CNsip_username|COsip_password|");
}

#[test]
fn fields_emitted_in_insertion_order() {
    let mut msg = Message::from_ff_values(&spec::M_LOGIN_RESP, &["1"]).unwrap();

    msg.add_field("CQ", "Y");
    msg.add_field("AA", "12345");

    assert_eq!(msg.to_sip('|'), "941CQY|AA12345|");
}

#[test]
fn checksum_balances_for_every_seq() {
    let msg = "2300120060101    084237AOUWOLS|AAdjfiander|AC|";

    for seq in '0'..='9' {
        let frame = checksum::with_trailer(msg, seq);
        assert!(checksum::verify(&frame), "seq {seq}: {frame}");
    }
}

#[test]
fn checksum_detects_corruption() {
    let frame = checksum::with_trailer("2300120060101    084237AOUWOLS|AAdjfiander|AC|", '2');
    let corrupt = frame.replacen("djfiander", "ejfiander", 1);

    assert!(!checksum::verify(&corrupt));
}

#[test]
fn checksum_requires_az_prefix() {
    assert!(!checksum::verify("23FFFF"));
    assert!(!checksum::verify("23"));
}

#[test]
fn schema_v1_carries_over_to_v2() {
    // Patron Status is declared for 1.00 only.
    let v1 = schema::lookup("23", ProtocolVersion::V1).unwrap();
    let v2 = schema::lookup("23", ProtocolVersion::V2).unwrap();

    assert_eq!(v1.fields().len(), v2.fields().len());
    assert_eq!(v1.fixed_len(), 21);
}

#[test]
fn v2_only_messages_rejected_under_v1() {
    for code in ["15", "17", "19", "25", "29", "35", "37", "63", "65", "93"] {
        assert!(
            schema::lookup(code, ProtocolVersion::V1).is_none(),
            "{code} should not resolve under 1.00"
        );
        assert!(
            schema::lookup(code, ProtocolVersion::V2).is_some(),
            "{code} should resolve under 2.00"
        );
    }
}

#[test]
fn parse_fixed_and_variable_fields() {
    let text = "11YN20060101    08423520060101    084235AOUWOLS|AAdjfiander|AB1565921879|AC|";
    let msg = Message::from_sip(text, ProtocolVersion::V2, '|').unwrap();

    assert_eq!(msg.spec().code, "11");
    assert_eq!(msg.fixed_fields()[0].value(), "Y");
    assert_eq!(msg.fixed_fields()[1].value(), "N");
    assert_eq!(msg.fixed_fields()[2].value(), "20060101    084235");
    assert_eq!(msg.get_field_value("AA"), Some("djfiander"));
    assert_eq!(msg.get_field_value("AB"), Some("1565921879"));
    assert_eq!(msg.get_field_value("AC"), Some(""));
}

#[test]
fn parse_keys_subset_of_schema() {
    // ZZ is not catalogued and AH is catalogued but not recognized on
    // a checkout request; both are skipped.
    let text = "11YN20060101    08423520060101    084235AAdjfiander|ZZbogus|AH20291231    235959|";
    let msg = Message::from_sip(text, ProtocolVersion::V2, '|').unwrap();
    let allowed = schema::lookup("11", ProtocolVersion::V2).unwrap();

    for field in msg.fields() {
        assert!(allowed.allows(field.code()));
    }

    assert_eq!(msg.get_field_value("ZZ"), None);
    assert_eq!(msg.get_field_value("AH"), None);
}

#[test]
fn parse_keeps_first_duplicate() {
    let text = "2300120060101    084237AAdjfiander|AAsomeone_else|";
    let msg = Message::from_sip(text, ProtocolVersion::V1, '|').unwrap();

    assert_eq!(msg.get_field_value("AA"), Some("djfiander"));
    assert_eq!(
        msg.fields().iter().filter(|f| f.code() == "AA").count(),
        1
    );
}

#[test]
fn parse_unterminated_final_field() {
    let text = "2300120060101    084237AOUWOLS|AAdjfiander";
    let msg = Message::from_sip(text, ProtocolVersion::V1, '|').unwrap();

    assert_eq!(msg.get_field_value("AA"), Some("djfiander"));
}

#[test]
fn parse_rejects_short_fixed_fields() {
    assert_eq!(
        Message::from_sip("230012006", ProtocolVersion::V1, '|').err(),
        Some(super::Error::MessageFormatError)
    );
}

#[test]
fn parse_rejects_unknown_code() {
    assert_eq!(
        Message::from_sip("XX", ProtocolVersion::V2, '|').err(),
        Some(super::Error::UnknownMessageError)
    );
}

#[test]
fn round_trip_variable_fields() {
    let values = [
        ("AO", "UWOLS"),
        ("AA", "djfiander"),
        ("AC", "terminal password"),
        ("AD", "6789"),
    ];

    let msg = Message::from_values(
        &spec::M_PATRON_STATUS,
        &["000", "20060101    084237"],
        &values,
    )
    .unwrap();

    let parsed = Message::from_sip(&msg.to_sip('|'), ProtocolVersion::V1, '|').unwrap();

    assert_eq!(parsed.spec().code, "23");
    assert_eq!(parsed.fixed_fields()[0].value(), "000");

    for (code, value) in values {
        assert_eq!(parsed.get_field_value(code), Some(value), "field {code}");
    }
}

#[test]
fn alternate_delimiter_round_trip() {
    let msg = Message::from_values(
        &spec::M_PATRON_STATUS,
        &["000", "20060101    084237"],
        &[("AO", "UWOLS"), ("AA", "djfiander")],
    )
    .unwrap();

    let text = msg.to_sip('^');
    assert!(text.ends_with("AOUWOLS^AAdjfiander^"));

    let parsed = Message::from_sip(&text, ProtocolVersion::V1, '^').unwrap();
    assert_eq!(parsed.get_field_value("AA"), Some("djfiander"));
}

#[test]
fn redacted_patron_password() {
    let msg = Message::from_values(
        &spec::M_PATRON_STATUS,
        &["000", "20060101    084237"],
        &[("AA", "djfiander"), ("AD", "6789")],
    )
    .unwrap();

    let text = msg.to_sip_redacted('|');
    assert!(text.contains("ADREDACTED|"));
    assert!(!text.contains("6789"));
}

#[test]
fn login_parses_under_v2_only() {
    let text = "9300CNscuser|COscpass|";

    assert!(Message::from_sip(text, ProtocolVersion::V2, '|').is_ok());
    assert_eq!(
        Message::from_sip(text, ProtocolVersion::V1, '|').err(),
        Some(super::Error::UnsupportedVersionError)
    );
}

//! End-to-end message handling tests: raw frames in, raw frames out,
//! against the in-memory demo backend.
use acsd::conf::{Account, Config};
use acsd::demo::DemoIls;
use acsd::session::Session;
use sipcodec::checksum;
use sipcodec::ProtocolVersion;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

const PATRON_STATUS_REQ: &str = "2300120060101    084237AOUWOLS|AAdjfiander|AC|";
const CHECKOUT_REQ: &str =
    "11YN20060101    08423520060101    084235AOUWOLS|AAdjfiander|AB1565921879|AC|";

fn test_session() -> Session {
    let mut config = Config::new();
    config.add_account(Account::new("scterm", "secret", "UWOLS"));

    Session::new(
        Arc::new(config),
        Arc::new(DemoIls::new("UWOLS")),
        Arc::new(AtomicBool::new(false)),
    )
}

fn logged_in_session() -> Session {
    let mut session = test_session();
    let (_, resp) = session.handle_frame("9300CNscterm|COsecret|", None);
    assert_eq!(resp.as_deref(), Some("941"));
    session
}

fn respond(session: &mut Session, frame: &str) -> String {
    let (_, resp) = session.handle_frame(frame, None);
    resp.expect("expected a response frame")
}

/// True if every character of `s` is either 'Y' or a space.
fn is_status_chars(s: &str) -> bool {
    s.chars().all(|c| c == 'Y' || c == ' ')
}

/// True if `s` looks like an 18-character SIP timestamp.
fn is_sip_timestamp(s: &str) -> bool {
    s.len() == 18
        && s[0..8].chars().all(|c| c.is_ascii_digit())
        && s[8..12].chars().all(|c| c == ' ')
        && s[12..18].chars().all(|c| c.is_ascii_digit())
}

#[test]
fn login_ok() {
    let mut session = test_session();
    assert!(!session.has_account());

    let resp = respond(&mut session, "9300CNscterm|COsecret|");

    assert_eq!(resp, "941");
    assert!(session.has_account());
}

#[test]
fn login_bad_password() {
    let mut session = test_session();

    let resp = respond(&mut session, "9300CNscterm|COwrong|");

    assert_eq!(resp, "940");
    assert!(!session.has_account());

    // The connection stays up; a retry is allowed.
    let resp = respond(&mut session, "9300CNscterm|COsecret|");
    assert_eq!(resp, "941");
}

#[test]
fn login_rejects_hashed_algorithms() {
    let mut session = test_session();

    let resp = respond(&mut session, "9311CNscterm|COsecret|");

    assert_eq!(resp, "940");
    assert!(!session.has_account());
}

#[test]
fn requests_gated_until_login() {
    let mut session = test_session();

    let (code, resp) = session.handle_frame(PATRON_STATUS_REQ, None);

    assert_eq!(code, "23");
    assert_eq!(resp, None);

    let (_, resp) = session.handle_frame("9300CNscterm|COsecret|", None);
    assert_eq!(resp.as_deref(), Some("941"));

    let (_, resp) = session.handle_frame(PATRON_STATUS_REQ, None);
    assert!(resp.is_some());
}

#[test]
fn expected_reply_gate() {
    let mut session = logged_in_session();

    // Not the expected code: acknowledged but not dispatched.
    let (code, resp) = session.handle_frame(PATRON_STATUS_REQ, Some("11"));
    assert_eq!(code, "23");
    assert_eq!(resp, None);

    // The expected code goes through.
    let (code, resp) = session.handle_frame(PATRON_STATUS_REQ, Some("23"));
    assert_eq!(code, "23");
    assert!(resp.is_some());
}

#[test]
fn patron_status_valid_patron() {
    let mut session = logged_in_session();

    let resp = respond(&mut session, PATRON_STATUS_REQ);

    assert_eq!(&resp[0..2], "24");

    // Patron in good standing: no privilege denied.
    let status = &resp[2..16];
    assert!(status.starts_with(' '));
    assert!(is_status_chars(status));

    assert_eq!(&resp[16..19], "001");
    assert!(is_sip_timestamp(&resp[19..37]));

    assert!(resp.contains("AEDavid J. Fiander|"));
    assert!(resp.contains("AAdjfiander|"));
    assert!(resp.contains("BLY|"));
    assert!(resp.contains("AOUWOLS|"));
}

#[test]
fn patron_status_invalid_barcode() {
    let mut session = logged_in_session();

    let resp = respond(
        &mut session,
        "2300120060101    084237AOUWOLS|AAbad_userid|AC|",
    );

    assert_eq!(&resp[0..2], "24");
    assert_eq!(&resp[2..16], "YYYY          ");
    assert_eq!(&resp[16..19], "001");

    assert!(resp.contains("AAbad_userid|"));
    assert!(resp.contains("AE|"));
    assert!(resp.contains("BLN|"));
}

#[test]
fn patron_status_wrong_password() {
    let mut session = logged_in_session();

    let resp = respond(
        &mut session,
        "2300120060101    084237AOUWOLS|AAdjfiander|AC|ADwrongpw|",
    );

    assert_eq!(&resp[0..2], "24");
    assert!(is_status_chars(&resp[2..16]));
    assert!(resp.contains("BLY|"));
    assert!(resp.contains("CQN|"));
}

#[test]
fn block_then_enable_patron() {
    let mut session = logged_in_session();

    // Block Patron is answered with a Patron Status response showing
    // every privilege denied and the unspecified language.
    let resp = respond(
        &mut session,
        "01N20060101    084237AOUWOLS|ALCard retained|AAdjfiander|",
    );

    assert_eq!(&resp[0..2], "24");
    assert!(resp[2..6].chars().all(|c| c == 'Y'));
    assert_eq!(&resp[16..19], "000");

    // Enable with the correct patron password restores privileges.
    let resp = respond(
        &mut session,
        "2520060101    084237AOUWOLS|AAdjfiander|AD6789|",
    );

    assert_eq!(&resp[0..2], "26");
    assert_eq!(&resp[2..6], "    ");
    assert!(is_status_chars(&resp[6..16]));
    assert_eq!(&resp[16..19], "000");
    assert!(resp.contains("CQY|"));
    assert!(resp.contains("BLY|"));
}

#[test]
fn patron_enable_wrong_password() {
    let mut session = logged_in_session();

    let resp = respond(
        &mut session,
        "2520060101    084237AOUWOLS|AAdjfiander|ADnope|",
    );

    assert_eq!(&resp[0..2], "26");
    assert_eq!(&resp[2..6], "YYYY");
    assert!(resp.contains("BLN|"));
    assert!(resp.contains("CQN|"));
}

#[test]
fn checksum_mismatch_requests_sc_resend() {
    let mut session = logged_in_session();

    let frame = checksum::with_trailer(PATRON_STATUS_REQ, '7');
    let corrupt = frame.replacen("djfiander", "djfiandeX", 1);

    let (code, resp) = session.handle_frame(&corrupt, None);

    // Exactly the two-character resend request; the patron status
    // handler was never invoked.
    assert_eq!(code, "96");
    assert_eq!(resp.as_deref(), Some("96"));
}

#[test]
fn checksum_mismatch_does_not_invoke_handler() {
    let mut session = test_session();

    let frame = checksum::with_trailer("9300CNscterm|COsecret|", '0');
    let corrupt = frame.replacen("secret", "sedret", 1);

    let (_, resp) = session.handle_frame(&corrupt, None);

    assert_eq!(resp.as_deref(), Some("96"));
    assert!(!session.has_account());
}

#[test]
fn login_upgrades_protocol_version() {
    let mut session = test_session();
    assert_eq!(session.protocol_version(), ProtocolVersion::V1);

    let resp = respond(&mut session, "9300CNscterm|COsecret|");
    assert!(resp.starts_with("94"));
    assert_eq!(session.protocol_version(), ProtocolVersion::V2);

    // The subsequent SC Status sees 2.00, visible in the 4-character
    // protocol field of the ACS Status response.
    let resp = respond(&mut session, "9900402.00");

    assert!(resp.starts_with("98Y"));
    assert_eq!(&resp[32..36], "2.00");
    assert!(resp.contains("BXYYYYYYYYYYYYYYYY|"));
    assert!(resp.contains("AOUWOLS|"));
}

#[test]
fn sealed_responses_echo_sequence_number() {
    let mut session = logged_in_session();

    let frame = checksum::with_trailer(PATRON_STATUS_REQ, '3');
    let (_, resp) = session.handle_frame(&frame, None);
    let resp = resp.unwrap();

    assert!(checksum::verify(&resp), "{resp}");
    assert_eq!(&resp[resp.len() - 9..resp.len() - 6], "AY3");
}

#[test]
fn resend_is_idempotent() {
    let mut session = logged_in_session();

    let frame = checksum::with_trailer(PATRON_STATUS_REQ, '5');
    let (_, sealed) = session.handle_frame(&frame, None);
    let sealed = sealed.unwrap();

    let (_, first) = session.handle_frame("97", None);
    let (_, second) = session.handle_frame("97", None);

    let first = first.unwrap();
    let second = second.unwrap();

    // Identical retransmissions, with the trailer cut.
    assert_eq!(first, second);
    assert_eq!(first, sealed[..sealed.len() - 9]);
}

#[test]
fn resend_before_any_response() {
    let mut session = test_session();

    let (code, resp) = session.handle_frame("97", None);

    assert_eq!(code, "97");
    assert_eq!(resp.as_deref(), Some("96"));
}

#[test]
fn resend_without_trailer_is_verbatim() {
    let mut session = logged_in_session();

    // No error detection in use yet, so the response has no trailer.
    let sealed = respond(&mut session, PATRON_STATUS_REQ);

    let (_, resent) = session.handle_frame("97", None);

    assert_eq!(resent.unwrap(), sealed);
}

#[test]
fn missing_trailer_disables_error_detection() {
    let mut session = logged_in_session();

    let frame = checksum::with_trailer(PATRON_STATUS_REQ, '1');
    let (_, resp) = session.handle_frame(&frame, None);
    assert!(checksum::verify(&resp.unwrap()));

    // The client stops sending trailers; the frame is processed
    // anyway and the response carries no trailer.
    let resp = respond(&mut session, PATRON_STATUS_REQ);

    assert!(resp.starts_with("24"));
    assert!(!checksum::verify(&resp));
    assert_ne!(&resp[resp.len() - 9..resp.len() - 7], "AY");
}

#[test]
fn checkout_and_checkin_cycle() {
    let mut session = logged_in_session();

    let resp = respond(&mut session, CHECKOUT_REQ);

    // ok, no renewal, non-magnetic, desensitize.
    assert!(resp.starts_with("121NNY"));
    assert!(is_sip_timestamp(&resp[6..24]));
    assert!(resp.contains("AAdjfiander|"));
    assert!(resp.contains("AB1565921879|"));
    assert!(resp.contains("AJPerl 5 desktop reference|"));
    assert!(resp.contains("AOUWOLS|"));

    // A due date was assigned.
    let due_at = resp.find("AH").unwrap();
    assert!(is_sip_timestamp(&resp[due_at + 2..due_at + 20]));

    let resp = respond(
        &mut session,
        "09N20060101    08423620060101    084236APMain library|AOUWOLS|AB1565921879|AC|",
    );

    // ok, resensitize, non-magnetic, no alert.
    assert!(resp.starts_with("101YNN"));
    assert!(resp.contains("AB1565921879|"));
    assert!(resp.contains("AQMain library|"));
    assert!(resp.contains("AJPerl 5 desktop reference|"));
    // Previous borrower, reported under 2.00.
    assert!(resp.contains("AAdjfiander|"));
}

#[test]
fn checkout_unknown_item() {
    let mut session = logged_in_session();

    let resp = respond(
        &mut session,
        "11YN20060101    08423520060101    084235AOUWOLS|AAdjfiander|AB000000|AC|",
    );

    assert!(resp.starts_with("120NUN"));
    assert!(resp.contains("AB000000|"));
    assert!(resp.contains("AJ|"));
    assert!(resp.contains("AH|"));
    assert!(resp.contains("BLY|"));
    assert!(resp.contains("AFUnknown item barcode|"));
}

#[test]
fn checkin_item_not_out() {
    let mut session = logged_in_session();

    let resp = respond(
        &mut session,
        "09N20060101    08423620060101    084236APMain library|AOUWOLS|AB1565921879|AC|",
    );

    assert!(resp.starts_with("100"));
    assert!(resp.contains("AFItem is not checked out|"));
}

#[test]
fn checkin_unknown_item() {
    let mut session = logged_in_session();

    let resp = respond(
        &mut session,
        "09N20060101    08423620060101    084236APMain library|AOUWOLS|AB000000|AC|",
    );

    // Not ok, no resensitize, unknown magnetic media, no alert.
    assert!(resp.starts_with("100NUN"));
    assert!(resp.contains("AB000000|"));
    // Permanent location is required even when the item is unknown.
    assert!(resp.contains("AQ|"));
    assert!(!resp.contains("AJ"));
    assert!(resp.contains("AFUnknown item barcode|"));
}

#[test]
fn item_information() {
    let mut session = logged_in_session();

    let resp = respond(&mut session, "1720060101    084237AOUWOLS|AB1565921879|");

    // Available, security marker 02, no fee.
    assert!(resp.starts_with("18030201"));
    assert!(resp.contains("AB1565921879|"));
    assert!(resp.contains("AJPerl 5 desktop reference|"));
    assert!(resp.contains("CK001|"));
    assert!(resp.contains("AQMain library|"));
    assert!(resp.contains("BGUWOLS|"));
}

#[test]
fn item_information_unknown_item() {
    let mut session = logged_in_session();

    let resp = respond(&mut session, "1720060101    084237AOUWOLS|AB000000|");

    assert!(resp.starts_with("18010101"));
    assert!(resp.contains("AB000000|"));
    assert!(resp.contains("AJ|"));
}

#[test]
fn item_status_update() {
    let mut session = logged_in_session();

    let resp = respond(
        &mut session,
        "1920060101    084237AOUWOLS|AB1565921879|CHdamaged spine|",
    );

    assert!(resp.starts_with("201"));
    assert!(resp.contains("AB1565921879|"));
    assert!(resp.contains("AJPerl 5 desktop reference|"));

    // The properties stick.
    let resp = respond(&mut session, "1720060101    084237AOUWOLS|AB1565921879|");
    assert!(resp.contains("CHdamaged spine|"));
}

#[test]
fn item_status_update_unknown_item() {
    let mut session = logged_in_session();

    let resp = respond(&mut session, "1920060101    084237AOUWOLS|AB000000|CHx|");

    assert!(resp.starts_with("200"));
    assert!(resp.contains("AB000000|"));
    assert!(!resp.contains("AJ"));
}

#[test]
fn patron_information_with_charged_summary() {
    let mut session = logged_in_session();

    respond(&mut session, CHECKOUT_REQ);

    // Summary position 2 selects the charged items list.
    let resp = respond(
        &mut session,
        "6300120060101    084237  Y       AOUWOLS|AAdjfiander|AD6789|",
    );

    assert_eq!(&resp[0..2], "64");
    assert!(is_status_chars(&resp[2..16]));
    assert_eq!(&resp[16..19], "001");

    // hold, overdue, charged, fine, recall, unavailable-hold counts.
    assert_eq!(&resp[37..61], "000000000001000000000000");

    assert!(resp.contains("AAdjfiander|"));
    assert!(resp.contains("AEDavid J. Fiander|"));
    assert!(resp.contains("AU1565921879|"));
    assert!(resp.contains("BLY|"));
    assert!(resp.contains("CQY|"));
    assert!(resp.contains("PB19640925|"));
    assert!(resp.contains("PCA|"));
    assert!(resp.contains("AOUWOLS|"));
}

#[test]
fn patron_information_unknown_patron() {
    let mut session = logged_in_session();

    let resp = respond(
        &mut session,
        "6300120060101    084237          AOUWOLS|AAnobody|",
    );

    assert_eq!(&resp[0..2], "64");
    assert_eq!(&resp[2..16], "YYYY          ");
    assert_eq!(&resp[37..61], "000000000000000000000000");
    assert!(resp.contains("AE|"));
    assert!(resp.contains("AAnobody|"));
    assert!(resp.contains("BLN|"));
}

#[test]
fn end_patron_session() {
    let mut session = logged_in_session();

    let resp = respond(&mut session, "3520060101    084237AOUWOLS|AAdjfiander|");

    assert!(resp.starts_with("36Y"));
    assert!(resp.contains("AAdjfiander|"));
    assert!(resp.contains("AOUWOLS|"));
}

#[test]
fn fee_paid() {
    let mut session = logged_in_session();

    let resp = respond(
        &mut session,
        "3720060101    0842370100USDAOUWOLS|AAdjfiander|BV1.50|BKtxn01|",
    );

    assert!(resp.starts_with("38Y"));
    assert!(resp.contains("AAdjfiander|"));
    assert!(resp.contains("BKtxn01|"));
}

#[test]
fn hold_add_and_cancel() {
    let mut session = logged_in_session();

    let resp = respond(
        &mut session,
        "15+20060101    084237AOUWOLS|AAdjfiander|AB0440242746|",
    );

    assert!(resp.starts_with("161Y"));
    assert!(resp.contains("AAdjfiander|"));
    assert!(resp.contains("BR1|"));
    assert!(resp.contains("AB0440242746|"));
    assert!(resp.contains("AJThe foundation trilogy|"));

    let resp = respond(
        &mut session,
        "15-20060101    084237AOUWOLS|AAdjfiander|AB0440242746|",
    );

    assert!(resp.starts_with("161Y"));
    assert!(resp.contains("AAdjfiander|"));
}

#[test]
fn hold_unknown_mode() {
    let mut session = logged_in_session();

    let resp = respond(
        &mut session,
        "15?20060101    084237AOUWOLS|AAdjfiander|AB0440242746|",
    );

    assert!(resp.starts_with("160N"));
    assert!(resp.contains("AAdjfiander|"));
    assert!(resp.contains("AF"));
}

#[test]
fn renew_charged_item() {
    let mut session = logged_in_session();

    respond(&mut session, CHECKOUT_REQ);

    let resp = respond(
        &mut session,
        "29NN20060101    08423720060101    084237AOUWOLS|AAdjfiander|AB1565921879|",
    );

    assert!(resp.starts_with("301YNN"));
    assert!(resp.contains("AAdjfiander|"));
    assert!(resp.contains("AB1565921879|"));
    assert!(resp.contains("AJPerl 5 desktop reference|"));
    assert!(resp.contains("CK001|"));
}

#[test]
fn renew_item_not_out() {
    let mut session = logged_in_session();

    let resp = respond(
        &mut session,
        "29NN20060101    08423720060101    084237AOUWOLS|AAdjfiander|AB1565921879|",
    );

    assert!(resp.starts_with("300NUN"));
    assert!(resp.contains("AAdjfiander|"));
    assert!(resp.contains("AB1565921879|"));
}

#[test]
fn renew_all() {
    let mut session = logged_in_session();

    respond(&mut session, CHECKOUT_REQ);

    let resp = respond(&mut session, "6520060101    084237AOUWOLS|AAdjfiander|");

    assert!(resp.starts_with("661"));
    assert_eq!(&resp[3..11], "00010000");
    assert!(resp.contains("BM1565921879|"));
}

#[test]
fn offline_no_block_checkout() {
    let mut session = logged_in_session();

    // The terminal was offline; the transaction is accepted with the
    // no-block due date the terminal assigned.
    let resp = respond(
        &mut session,
        "11NY20060101    08423520060201    235959AOUWOLS|AAdjfiander|AB0440242746|AC|",
    );

    assert!(resp.starts_with("121"));
    assert!(resp.contains("AH20060201    235959|"));
}

#[test]
fn sc_status_downgrades_to_v1() {
    let mut session = logged_in_session();
    assert_eq!(session.protocol_version(), ProtocolVersion::V2);

    let resp = respond(&mut session, "9900401.00");

    assert!(resp.starts_with("98Y"));
    assert_eq!(&resp[32..36], "1.00");
    // 1.00 responses carry no supported-messages field.
    assert!(!resp.contains("BX"));
}

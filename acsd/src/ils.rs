//! The ILS collaborator interface.
//!
//! Handlers read these types and compose them into responses; they
//! never mutate ILS data directly.  An ILS conveys transaction failure
//! through the `ok` flag of the returned status, never by panicking,
//! so every request can be answered with exactly one response.
use sipcodec::spec;

/// Optional ACS behaviors an ILS may or may not implement.
///
/// Unsupported capabilities have defined fallbacks: magnetic media is
/// reported as 'U' (unknown) and the security inhibit field is left
/// off responses entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    MagneticMedia,
    SecurityInhibit,
}

/// Patron data as supplied by the ILS.
#[derive(Debug, Clone)]
pub struct Patron {
    /// Patron identifier as the ILS knows it, which wins over the
    /// barcode the terminal scanned.
    pub id: String,
    pub name: String,

    /// 3-character SIP language code, "000" when unspecified.
    pub language: String,

    // Privilege flags.  These appear in the patron status string in
    // inverted sense: 'Y' on the wire means denied.
    pub charge_ok: bool,
    pub renew_ok: bool,
    pub recall_ok: bool,
    pub hold_ok: bool,

    // Condition flags, 'Y' on the wire when the condition holds.
    pub card_lost: bool,
    pub too_many_charged: bool,
    pub too_many_overdue: bool,
    pub too_many_renewal: bool,
    pub too_many_claim_return: bool,
    pub too_many_lost: bool,
    pub excessive_fines: bool,
    pub excessive_fees: bool,
    pub recall_overdue: bool,
    pub too_many_billed: bool,

    // Detail lists for the Patron Information summary.  The summary
    // counts are the lengths of these lists.
    pub hold_items: Vec<String>,
    pub overdue_items: Vec<String>,
    pub charged_items: Vec<String>,
    pub fine_items: Vec<String>,
    pub recall_items: Vec<String>,
    pub unavail_hold_items: Vec<String>,

    pub address: Option<String>,
    pub email_addr: Option<String>,
    pub home_phone: Option<String>,
    pub birthdate: Option<String>,
    pub patron_class: Option<String>,

    pub fee_amount: Option<f64>,
    pub currency: Option<String>,

    pub screen_msg: Option<String>,
    pub print_line: Option<String>,
}

impl Patron {
    pub fn new(id: &str, name: &str) -> Patron {
        Patron {
            id: id.to_string(),
            name: name.to_string(),
            language: String::from("000"),
            charge_ok: false,
            renew_ok: false,
            recall_ok: false,
            hold_ok: false,
            card_lost: false,
            too_many_charged: false,
            too_many_overdue: false,
            too_many_renewal: false,
            too_many_claim_return: false,
            too_many_lost: false,
            excessive_fines: false,
            excessive_fees: false,
            recall_overdue: false,
            too_many_billed: false,
            hold_items: Vec::new(),
            overdue_items: Vec::new(),
            charged_items: Vec::new(),
            fine_items: Vec::new(),
            recall_items: Vec::new(),
            unavail_hold_items: Vec::new(),
            address: None,
            email_addr: None,
            home_phone: None,
            birthdate: None,
            patron_class: None,
            fee_amount: None,
            currency: None,
            screen_msg: None,
            print_line: None,
        }
    }

    /// Detail list for a Patron Information summary position, paired
    /// with the response field that carries it.
    ///
    /// Positions beyond the six defined lists return None.
    pub fn summary_list(&self, position: usize) -> Option<(&'static spec::Field, &[String])> {
        let (field, list) = match position {
            0 => (&spec::F_HOLD_ITEMS, &self.hold_items),
            1 => (&spec::F_OVERDUE_ITEMS, &self.overdue_items),
            2 => (&spec::F_CHARGED_ITEMS, &self.charged_items),
            3 => (&spec::F_FINE_ITEMS, &self.fine_items),
            4 => (&spec::F_RECALL_ITEMS, &self.recall_items),
            5 => (&spec::F_UNAVAIL_HOLD_ITEMS, &self.unavail_hold_items),
            _ => return None,
        };

        Some((field, list.as_slice()))
    }
}

/// Item data as supplied by the ILS.
#[derive(Debug, Clone)]
pub struct Item {
    pub id: String,
    pub title: String,

    /// Only reported when the ILS supports the magnetic media
    /// capability; 'U' is sent otherwise.
    pub magnetic_media: bool,

    pub sip_media_type: Option<String>,
    pub sip_item_properties: Option<String>,

    pub permanent_location: String,
    pub current_location: Option<String>,
    pub owner: Option<String>,

    // 2-character fixed field values of the Item Information response.
    pub circulation_status: String,
    pub security_marker: String,
    pub fee_type: String,

    pub fee: f64,
    pub fee_currency: Option<String>,

    /// SIP-format due date when the item is charged.
    pub due_date: Option<String>,
    pub recall_date: Option<String>,
    pub hold_pickup_date: Option<String>,

    pub hold_queue_length: usize,

    pub screen_msg: Option<String>,
    pub print_line: Option<String>,
}

impl Item {
    pub fn new(id: &str, title: &str) -> Item {
        Item {
            id: id.to_string(),
            title: title.to_string(),
            magnetic_media: false,
            sip_media_type: None,
            sip_item_properties: None,
            permanent_location: String::new(),
            current_location: None,
            owner: None,
            // Available, no security marker concerns, no fee.
            circulation_status: String::from("03"),
            security_marker: String::from("02"),
            fee_type: String::from("01"),
            fee: 0.0,
            fee_currency: None,
            due_date: None,
            recall_date: None,
            hold_pickup_date: None,
            hold_queue_length: 0,
            screen_msg: None,
            print_line: None,
        }
    }
}

/// Checkout transaction result.
#[derive(Debug, Default)]
pub struct CheckoutStatus {
    pub ok: bool,
    pub renew_ok: bool,
    pub desensitize: bool,
    pub security_inhibit: bool,

    pub fee_amount: Option<f64>,
    pub fee_type: Option<String>,
    pub currency: Option<String>,
    pub transaction_id: Option<String>,

    /// The patron and item involved, when they resolved.  The item
    /// carries the due date assigned by the checkout.
    pub patron: Option<Patron>,
    pub item: Option<Item>,

    pub screen_msg: Option<String>,
    pub print_line: Option<String>,
}

/// Checkin transaction result.
#[derive(Debug, Default)]
pub struct CheckinStatus {
    pub ok: bool,
    pub resensitize: bool,
    pub alert: bool,
    pub sort_bin: Option<String>,

    /// The patron the item was charged to, if any.
    pub patron: Option<Patron>,
    pub item: Option<Item>,

    pub screen_msg: Option<String>,
    pub print_line: Option<String>,
}

/// Hold transaction result, for add, cancel, and alter alike.
#[derive(Debug, Default)]
pub struct HoldStatus {
    pub ok: bool,
    pub item_available: bool,

    /// SIP-format hold expiration, when one applies.
    pub expiration_date: Option<String>,
    pub queue_position: Option<usize>,
    pub pickup_location: Option<String>,

    pub patron: Option<Patron>,
    pub item: Option<Item>,

    pub screen_msg: Option<String>,
    pub print_line: Option<String>,
}

/// Renew transaction result.
#[derive(Debug, Default)]
pub struct RenewStatus {
    pub renewal_ok: bool,
    pub desensitize: bool,
    pub security_inhibit: bool,

    pub fee_amount: Option<f64>,
    pub fee_type: Option<String>,
    pub currency: Option<String>,
    pub transaction_id: Option<String>,

    pub patron: Option<Patron>,
    pub item: Option<Item>,

    pub screen_msg: Option<String>,
    pub print_line: Option<String>,
}

/// Renew All transaction result.
#[derive(Debug, Default)]
pub struct RenewAllStatus {
    pub ok: bool,
    pub renewed: Vec<String>,
    pub unrenewed: Vec<String>,
    pub screen_msg: Option<String>,
    pub print_line: Option<String>,
}

/// Fee payment result.
#[derive(Debug, Default)]
pub struct PaymentStatus {
    pub ok: bool,
    pub transaction_id: Option<String>,
    pub screen_msg: Option<String>,
    pub print_line: Option<String>,
}

/// End Patron Session result.
#[derive(Debug, Default)]
pub struct SessionStatus {
    pub ok: bool,
    pub screen_msg: Option<String>,
    pub print_line: Option<String>,
}

/// Item Status Update result.
#[derive(Debug, Default)]
pub struct UpdateStatus {
    pub ok: bool,
    pub screen_msg: Option<String>,
    pub print_line: Option<String>,
}

/// Arguments of a Hold request.
#[derive(Debug, Default)]
pub struct HoldParams {
    pub patron_id: String,
    pub patron_pwd: Option<String>,
    pub item_id: Option<String>,
    pub title_id: Option<String>,
    pub expiry_date: Option<String>,
    pub pickup_location: Option<String>,
    pub hold_type: Option<String>,
    pub fee_ack: bool,
}

/// Arguments of a Renew request.
#[derive(Debug, Default)]
pub struct RenewParams {
    pub patron_id: String,
    pub patron_pwd: Option<String>,
    pub item_id: Option<String>,
    pub title_id: Option<String>,
    pub no_block: bool,
    pub nb_due_date: String,
    pub third_party: bool,
    pub item_props: Option<String>,
    pub fee_ack: bool,
}

/// Arguments of a Fee Paid request.
#[derive(Debug, Default)]
pub struct FeePayment {
    pub patron_id: String,
    pub patron_pwd: Option<String>,
    pub fee_amount: String,
    pub fee_type: String,
    pub pay_type: String,
    pub currency: String,
    pub fee_id: Option<String>,
    pub transaction_id: Option<String>,
}

/// The circulation backend the server executes requests against.
///
/// One instance is shared by every connection; implementations must
/// be safe for concurrent use.
pub trait Ils: Send + Sync {
    fn institution(&self) -> &str;

    fn supports(&self, cap: Capability) -> bool;

    fn checkout_ok(&self) -> bool;
    fn checkin_ok(&self) -> bool;
    fn status_update_ok(&self) -> bool;
    fn offline_ok(&self) -> bool;

    /// Log a mismatch between the institution a terminal claims and
    /// the one this ILS serves.
    fn check_inst_id(&self, inst_id: &str, whence: &str) {
        if inst_id != self.institution() {
            log::warn!(
                "{whence}: received institution '{inst_id}', expected '{}'",
                self.institution()
            );
        }
    }

    /// Patron lookup; None when the barcode is unknown.
    fn patron(&self, patron_id: &str) -> Option<Patron>;

    /// Item lookup; None when the barcode is unknown.
    fn item(&self, item_id: &str) -> Option<Item>;

    fn check_password(&self, patron_id: &str, password: &str) -> bool;

    /// Administratively block a patron card.  Returns the updated
    /// patron, or None for an unknown barcode.
    fn block_patron(
        &self,
        patron_id: &str,
        card_retained: bool,
        blocked_card_msg: &str,
    ) -> Option<Patron>;

    /// Re-enable a blocked patron.  Returns the updated patron, or
    /// None for an unknown barcode.
    fn enable_patron(&self, patron_id: &str) -> Option<Patron>;

    fn checkout(&self, patron_id: &str, item_id: &str, sc_renewal_policy: bool) -> CheckoutStatus;

    /// Record a checkout performed while the terminal was offline.
    /// The circulation data may no longer match the real world; the
    /// transaction is accepted for accounting regardless.
    fn checkout_no_block(
        &self,
        patron_id: &str,
        item_id: &str,
        sc_renewal_policy: bool,
        trans_date: &str,
        nb_due_date: &str,
    ) -> CheckoutStatus;

    fn checkin(
        &self,
        item_id: &str,
        current_location: Option<&str>,
        return_date: &str,
        item_props: Option<&str>,
        cancel: bool,
    ) -> CheckinStatus;

    /// Record a checkin performed while the terminal was offline.
    fn checkin_no_block(
        &self,
        item_id: &str,
        trans_date: &str,
        return_date: &str,
        item_props: Option<&str>,
    ) -> CheckinStatus;

    fn item_status_update(&self, item_id: &str, item_props: &str) -> UpdateStatus;

    fn end_patron_session(&self, patron_id: &str) -> SessionStatus;

    fn pay_fee(&self, payment: &FeePayment) -> PaymentStatus;

    fn add_hold(&self, params: &HoldParams) -> HoldStatus;
    fn cancel_hold(&self, params: &HoldParams) -> HoldStatus;
    fn alter_hold(&self, params: &HoldParams) -> HoldStatus;

    fn renew(&self, params: &RenewParams) -> RenewStatus;
    fn renew_all(&self, patron_id: &str, patron_pwd: Option<&str>, fee_ack: bool) -> RenewAllStatus;
}

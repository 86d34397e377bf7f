//! In-memory ILS backend.
//!
//! Implements the full collaborator interface against a handful of
//! built-in patrons and items, with just enough circulation
//! bookkeeping to exercise every message handler.  This is what the
//! binary serves out of the box and what the integration tests run
//! against; a production deployment supplies its own [`Ils`]
//! implementation instead.
use crate::ils::{
    Capability, CheckinStatus, CheckoutStatus, FeePayment, HoldParams, HoldStatus, Ils, Item,
    PaymentStatus, Patron, RenewAllStatus, RenewParams, RenewStatus, SessionStatus, UpdateStatus,
};
use chrono::{Duration, Local};
use sipcodec::spec;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

const LOAN_PERIOD_DAYS: i64 = 21;

struct PatronRecord {
    patron: Patron,
    password: Option<String>,
}

struct HoldRecord {
    patron_id: String,
    pickup_location: Option<String>,
    expiry_date: Option<String>,
}

struct ItemRecord {
    item: Item,
    charged_to: Option<String>,
    holds: Vec<HoldRecord>,
}

struct State {
    patrons: HashMap<String, PatronRecord>,
    items: HashMap<String, ItemRecord>,
}

pub struct DemoIls {
    institution: String,
    state: Mutex<State>,
}

impl DemoIls {
    pub fn new(institution: &str) -> DemoIls {
        let mut patrons = HashMap::new();
        let mut items = HashMap::new();

        let mut fiander = Patron::new("djfiander", "David J. Fiander");
        fiander.charge_ok = true;
        fiander.renew_ok = true;
        fiander.recall_ok = true;
        fiander.hold_ok = true;
        fiander.address = Some(String::from("2 Meadowvale Dr. St Thomas, ON"));
        fiander.email_addr = Some(String::from("djfiander@hotmail.com"));
        fiander.home_phone = Some(String::from("(519) 555 1234"));
        fiander.birthdate = Some(String::from("19640925"));
        fiander.patron_class = Some(String::from("A"));

        patrons.insert(
            fiander.id.clone(),
            PatronRecord {
                patron: fiander,
                password: Some(String::from("6789")),
            },
        );

        let mut smith = Patron::new("tsmith", "Terry Smith");
        smith.charge_ok = true;
        smith.renew_ok = true;
        smith.recall_ok = true;
        smith.hold_ok = true;

        patrons.insert(
            smith.id.clone(),
            PatronRecord {
                patron: smith,
                password: None,
            },
        );

        for (barcode, title) in [
            ("1565921879", "Perl 5 desktop reference"),
            ("0440242746", "The foundation trilogy"),
            ("0140481893", "Long day's journey into night"),
        ] {
            let mut item = Item::new(barcode, title);
            item.sip_media_type = Some(String::from("001"));
            item.permanent_location = String::from("Main library");
            item.owner = Some(institution.to_string());

            items.insert(
                item.id.clone(),
                ItemRecord {
                    item,
                    charged_to: None,
                    holds: Vec::new(),
                },
            );
        }

        DemoIls {
            institution: institution.to_string(),
            state: Mutex::new(State { patrons, items }),
        }
    }

    fn state(&self) -> MutexGuard<State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Copy of a patron with the summary lists rebuilt from current
    /// circulation state.
    fn patron_snapshot(state: &State, patron_id: &str) -> Option<Patron> {
        let record = state.patrons.get(patron_id)?;
        let mut patron = record.patron.clone();

        for (barcode, item) in state.items.iter() {
            if item.charged_to.as_deref() == Some(patron_id) {
                patron.charged_items.push(barcode.clone());
            }
            if item.holds.iter().any(|h| h.patron_id == patron_id) {
                patron.hold_items.push(barcode.clone());
            }
        }

        // HashMap iteration order is arbitrary.
        patron.charged_items.sort();
        patron.hold_items.sort();

        Some(patron)
    }

    fn item_snapshot(state: &State, item_id: &str) -> Option<Item> {
        let record = state.items.get(item_id)?;
        let mut item = record.item.clone();
        item.hold_queue_length = record.holds.len();
        Some(item)
    }

    fn due_date_from_now() -> String {
        (Local::now() + Duration::days(LOAN_PERIOD_DAYS))
            .format(spec::SIP_DATE_FORMAT)
            .to_string()
    }
}

impl Ils for DemoIls {
    fn institution(&self) -> &str {
        &self.institution
    }

    fn supports(&self, cap: Capability) -> bool {
        match cap {
            Capability::MagneticMedia => true,
            Capability::SecurityInhibit => false,
        }
    }

    fn checkout_ok(&self) -> bool {
        true
    }

    fn checkin_ok(&self) -> bool {
        true
    }

    fn status_update_ok(&self) -> bool {
        true
    }

    fn offline_ok(&self) -> bool {
        true
    }

    fn patron(&self, patron_id: &str) -> Option<Patron> {
        let state = self.state();
        DemoIls::patron_snapshot(&state, patron_id)
    }

    fn item(&self, item_id: &str) -> Option<Item> {
        let state = self.state();
        DemoIls::item_snapshot(&state, item_id)
    }

    fn check_password(&self, patron_id: &str, password: &str) -> bool {
        let state = self.state();

        match state.patrons.get(patron_id) {
            Some(record) => match record.password.as_ref() {
                Some(expected) => !password.is_empty() && expected == password,
                None => true,
            },
            None => false,
        }
    }

    fn block_patron(
        &self,
        patron_id: &str,
        card_retained: bool,
        blocked_card_msg: &str,
    ) -> Option<Patron> {
        let mut state = self.state();

        {
            let record = state.patrons.get_mut(patron_id)?;
            let patron = &mut record.patron;

            patron.charge_ok = false;
            patron.renew_ok = false;
            patron.recall_ok = false;
            patron.hold_ok = false;

            if !blocked_card_msg.is_empty() {
                patron.screen_msg = Some(blocked_card_msg.to_string());
            }

            if card_retained {
                log::info!("Terminal retained the card of patron '{patron_id}'");
            }
        }

        DemoIls::patron_snapshot(&state, patron_id)
    }

    fn enable_patron(&self, patron_id: &str) -> Option<Patron> {
        let mut state = self.state();

        {
            let record = state.patrons.get_mut(patron_id)?;
            let patron = &mut record.patron;

            patron.charge_ok = true;
            patron.renew_ok = true;
            patron.recall_ok = true;
            patron.hold_ok = true;
            patron.screen_msg = None;
        }

        DemoIls::patron_snapshot(&state, patron_id)
    }

    fn checkout(&self, patron_id: &str, item_id: &str, sc_renewal_policy: bool) -> CheckoutStatus {
        let mut state = self.state();

        if !state.patrons.contains_key(patron_id) {
            return CheckoutStatus {
                screen_msg: Some(String::from("Unknown patron barcode")),
                ..CheckoutStatus::default()
            };
        }

        if !state.patrons[patron_id].patron.charge_ok {
            return CheckoutStatus {
                patron: DemoIls::patron_snapshot(&state, patron_id),
                screen_msg: Some(String::from("Patron privileges are suspended")),
                ..CheckoutStatus::default()
            };
        }

        let record = match state.items.get_mut(item_id) {
            Some(r) => r,
            None => {
                return CheckoutStatus {
                    patron: DemoIls::patron_snapshot(&state, patron_id),
                    screen_msg: Some(String::from("Unknown item barcode")),
                    ..CheckoutStatus::default()
                };
            }
        };

        let mut renewal = false;

        match record.charged_to.as_deref() {
            Some(current) if current == patron_id => {
                if !sc_renewal_policy {
                    return CheckoutStatus {
                        patron: DemoIls::patron_snapshot(&state, patron_id),
                        item: DemoIls::item_snapshot(&state, item_id),
                        screen_msg: Some(String::from("Item is already checked out")),
                        ..CheckoutStatus::default()
                    };
                }

                renewal = true;
            }
            Some(_) => {
                return CheckoutStatus {
                    patron: DemoIls::patron_snapshot(&state, patron_id),
                    item: DemoIls::item_snapshot(&state, item_id),
                    screen_msg: Some(String::from("Item is checked out to another patron")),
                    ..CheckoutStatus::default()
                };
            }
            None => {}
        }

        let magnetic = record.item.magnetic_media;
        record.charged_to = Some(patron_id.to_string());
        record.item.due_date = Some(DemoIls::due_date_from_now());
        record.item.circulation_status = String::from("04"); // charged

        CheckoutStatus {
            ok: true,
            renew_ok: renewal,
            desensitize: !magnetic,
            patron: DemoIls::patron_snapshot(&state, patron_id),
            item: DemoIls::item_snapshot(&state, item_id),
            ..CheckoutStatus::default()
        }
    }

    fn checkout_no_block(
        &self,
        patron_id: &str,
        item_id: &str,
        _sc_renewal_policy: bool,
        trans_date: &str,
        nb_due_date: &str,
    ) -> CheckoutStatus {
        let mut state = self.state();

        log::info!("Accepting off-line checkout of '{item_id}' to '{patron_id}' from {trans_date}");

        // The terminal already handed the item over while we were
        // unreachable; record what it tells us.
        if let Some(record) = state.items.get_mut(item_id) {
            record.charged_to = Some(patron_id.to_string());
            record.item.due_date = Some(nb_due_date.to_string());
            record.item.circulation_status = String::from("04");
        }

        CheckoutStatus {
            ok: true,
            desensitize: true,
            patron: DemoIls::patron_snapshot(&state, patron_id),
            item: DemoIls::item_snapshot(&state, item_id),
            ..CheckoutStatus::default()
        }
    }

    fn checkin(
        &self,
        item_id: &str,
        _current_location: Option<&str>,
        _return_date: &str,
        _item_props: Option<&str>,
        _cancel: bool,
    ) -> CheckinStatus {
        let mut state = self.state();

        let record = match state.items.get_mut(item_id) {
            Some(r) => r,
            None => {
                return CheckinStatus {
                    screen_msg: Some(String::from("Unknown item barcode")),
                    ..CheckinStatus::default()
                };
            }
        };

        let charged_to = record.charged_to.take();
        let magnetic = record.item.magnetic_media;
        let has_holds = !record.holds.is_empty();

        if charged_to.is_some() {
            record.item.due_date = None;
            record.item.circulation_status = String::from("03"); // available
        }

        match charged_to {
            Some(patron_id) => CheckinStatus {
                ok: true,
                resensitize: !magnetic,
                alert: has_holds,
                patron: DemoIls::patron_snapshot(&state, &patron_id),
                item: DemoIls::item_snapshot(&state, item_id),
                ..CheckinStatus::default()
            },
            None => CheckinStatus {
                alert: has_holds,
                item: DemoIls::item_snapshot(&state, item_id),
                screen_msg: Some(String::from("Item is not checked out")),
                ..CheckinStatus::default()
            },
        }
    }

    fn checkin_no_block(
        &self,
        item_id: &str,
        trans_date: &str,
        _return_date: &str,
        _item_props: Option<&str>,
    ) -> CheckinStatus {
        let mut state = self.state();

        log::info!("Accepting off-line checkin of '{item_id}' from {trans_date}");

        let record = match state.items.get_mut(item_id) {
            Some(r) => r,
            None => {
                return CheckinStatus {
                    screen_msg: Some(String::from("Unknown item barcode")),
                    ..CheckinStatus::default()
                };
            }
        };

        let charged_to = record.charged_to.take();
        let magnetic = record.item.magnetic_media;

        record.item.due_date = None;
        record.item.circulation_status = String::from("03");

        CheckinStatus {
            ok: true,
            resensitize: !magnetic,
            patron: charged_to.and_then(|id| DemoIls::patron_snapshot(&state, &id)),
            item: DemoIls::item_snapshot(&state, item_id),
            ..CheckinStatus::default()
        }
    }

    fn item_status_update(&self, item_id: &str, item_props: &str) -> UpdateStatus {
        let mut state = self.state();

        match state.items.get_mut(item_id) {
            Some(record) => {
                record.item.sip_item_properties = Some(item_props.to_string());
                UpdateStatus {
                    ok: true,
                    ..UpdateStatus::default()
                }
            }
            None => UpdateStatus {
                screen_msg: Some(String::from("Unknown item barcode")),
                ..UpdateStatus::default()
            },
        }
    }

    fn end_patron_session(&self, patron_id: &str) -> SessionStatus {
        let state = self.state();

        SessionStatus {
            ok: state.patrons.contains_key(patron_id),
            ..SessionStatus::default()
        }
    }

    fn pay_fee(&self, payment: &FeePayment) -> PaymentStatus {
        let state = self.state();

        if !state.patrons.contains_key(payment.patron_id.as_str()) {
            return PaymentStatus {
                screen_msg: Some(String::from("Unknown patron barcode")),
                ..PaymentStatus::default()
            };
        }

        log::info!(
            "Accepting payment of {} {} for patron '{}'",
            payment.fee_amount,
            payment.currency,
            payment.patron_id
        );

        PaymentStatus {
            ok: true,
            transaction_id: payment.transaction_id.clone(),
            ..PaymentStatus::default()
        }
    }

    fn add_hold(&self, params: &HoldParams) -> HoldStatus {
        let mut state = self.state();

        if !state.patrons.contains_key(params.patron_id.as_str()) {
            return HoldStatus {
                screen_msg: Some(String::from("Unknown patron barcode")),
                ..HoldStatus::default()
            };
        }

        let item_id = params.item_id.as_deref().unwrap_or("");

        let record = match state.items.get_mut(item_id) {
            Some(r) => r,
            None => {
                return HoldStatus {
                    patron: DemoIls::patron_snapshot(&state, &params.patron_id),
                    screen_msg: Some(String::from("Unknown item barcode")),
                    ..HoldStatus::default()
                };
            }
        };

        record.holds.push(HoldRecord {
            patron_id: params.patron_id.clone(),
            pickup_location: params.pickup_location.clone(),
            expiry_date: params.expiry_date.clone(),
        });

        let queue_position = record.holds.len();
        let item_available = record.charged_to.is_none();

        HoldStatus {
            ok: true,
            item_available,
            queue_position: Some(queue_position),
            expiration_date: params.expiry_date.clone(),
            pickup_location: params.pickup_location.clone(),
            patron: DemoIls::patron_snapshot(&state, &params.patron_id),
            item: DemoIls::item_snapshot(&state, item_id),
            ..HoldStatus::default()
        }
    }

    fn cancel_hold(&self, params: &HoldParams) -> HoldStatus {
        let mut state = self.state();

        let item_id = params.item_id.as_deref().unwrap_or("");

        let record = match state.items.get_mut(item_id) {
            Some(r) => r,
            None => {
                return HoldStatus {
                    screen_msg: Some(String::from("Unknown item barcode")),
                    ..HoldStatus::default()
                };
            }
        };

        let before = record.holds.len();
        record.holds.retain(|h| h.patron_id != params.patron_id);

        if record.holds.len() == before {
            return HoldStatus {
                patron: DemoIls::patron_snapshot(&state, &params.patron_id),
                screen_msg: Some(String::from("No hold to cancel")),
                ..HoldStatus::default()
            };
        }

        let item_available = record.charged_to.is_none();

        HoldStatus {
            ok: true,
            item_available,
            patron: DemoIls::patron_snapshot(&state, &params.patron_id),
            item: DemoIls::item_snapshot(&state, item_id),
            ..HoldStatus::default()
        }
    }

    fn alter_hold(&self, params: &HoldParams) -> HoldStatus {
        let mut state = self.state();

        let item_id = params.item_id.as_deref().unwrap_or("");

        let record = match state.items.get_mut(item_id) {
            Some(r) => r,
            None => {
                return HoldStatus {
                    screen_msg: Some(String::from("Unknown item barcode")),
                    ..HoldStatus::default()
                };
            }
        };

        let hold = match record
            .holds
            .iter_mut()
            .find(|h| h.patron_id == params.patron_id)
        {
            Some(h) => h,
            None => {
                return HoldStatus {
                    patron: DemoIls::patron_snapshot(&state, &params.patron_id),
                    screen_msg: Some(String::from("No hold to update")),
                    ..HoldStatus::default()
                };
            }
        };

        if params.pickup_location.is_some() {
            hold.pickup_location = params.pickup_location.clone();
        }
        if params.expiry_date.is_some() {
            hold.expiry_date = params.expiry_date.clone();
        }

        let expiration_date = hold.expiry_date.clone();
        let pickup_location = hold.pickup_location.clone();
        let item_available = record.charged_to.is_none();

        HoldStatus {
            ok: true,
            item_available,
            expiration_date,
            pickup_location,
            patron: DemoIls::patron_snapshot(&state, &params.patron_id),
            item: DemoIls::item_snapshot(&state, item_id),
            ..HoldStatus::default()
        }
    }

    fn renew(&self, params: &RenewParams) -> RenewStatus {
        let mut state = self.state();

        let item_id = params.item_id.as_deref().unwrap_or("");

        let record = match state.items.get_mut(item_id) {
            Some(r) => r,
            None => {
                return RenewStatus {
                    patron: DemoIls::patron_snapshot(&state, &params.patron_id),
                    screen_msg: Some(String::from("Unknown item barcode")),
                    ..RenewStatus::default()
                };
            }
        };

        if record.charged_to.as_deref() != Some(params.patron_id.as_str()) {
            return RenewStatus {
                patron: DemoIls::patron_snapshot(&state, &params.patron_id),
                item: DemoIls::item_snapshot(&state, item_id),
                screen_msg: Some(String::from("Item is not checked out to this patron")),
                ..RenewStatus::default()
            };
        }

        record.item.due_date = Some(DemoIls::due_date_from_now());

        RenewStatus {
            renewal_ok: true,
            patron: DemoIls::patron_snapshot(&state, &params.patron_id),
            item: DemoIls::item_snapshot(&state, item_id),
            ..RenewStatus::default()
        }
    }

    fn renew_all(
        &self,
        patron_id: &str,
        _patron_pwd: Option<&str>,
        _fee_ack: bool,
    ) -> RenewAllStatus {
        let mut state = self.state();

        if !state.patrons.contains_key(patron_id) {
            return RenewAllStatus {
                screen_msg: Some(String::from("Unknown patron barcode")),
                ..RenewAllStatus::default()
            };
        }

        let mut renewed = Vec::new();

        for (barcode, record) in state.items.iter_mut() {
            if record.charged_to.as_deref() == Some(patron_id) {
                record.item.due_date = Some(DemoIls::due_date_from_now());
                renewed.push(barcode.clone());
            }
        }

        renewed.sort();

        RenewAllStatus {
            ok: true,
            renewed,
            ..RenewAllStatus::default()
        }
    }
}

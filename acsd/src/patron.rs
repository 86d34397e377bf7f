use crate::ils::Patron;
use crate::session::Session;
use sipcodec::spec::ProtocolVersion;
use sipcodec::{spec, util, Message};

/// Status string of a patron the ILS does not know: every privilege
/// denied, no conditions reported.
const INVALID_PATRON_STATUS: &str = "YYYY          ";

/// The 14-character patron status string.
///
/// Positions 0-3 are the privilege bits, with inverted sense ('Y'
/// means denied); the remaining ten are condition flags.
fn patron_status_string(patron: &Patron) -> String {
    let mut status = String::with_capacity(14);

    status += util::denied_bool(patron.charge_ok);
    status += util::denied_bool(patron.renew_ok);
    status += util::denied_bool(patron.recall_ok);
    status += util::denied_bool(patron.hold_ok);
    status += util::space_bool(patron.card_lost);
    status += util::space_bool(patron.too_many_charged);
    status += util::space_bool(patron.too_many_overdue);
    status += util::space_bool(patron.too_many_renewal);
    status += util::space_bool(patron.too_many_claim_return);
    status += util::space_bool(patron.too_many_lost);
    status += util::space_bool(patron.excessive_fines);
    status += util::space_bool(patron.excessive_fees);
    status += util::space_bool(patron.recall_overdue);
    status += util::space_bool(patron.too_many_billed);

    status
}

impl Session {
    pub fn handle_patron_status(&mut self, msg: &Message) -> Message {
        let lang = msg.fixed_fields()[0].value().to_string();

        self.ils().check_inst_id(
            msg.get_field_value("AO").unwrap_or(""),
            "handle_patron_status",
        );

        let patron = msg
            .get_field_value("AA")
            .and_then(|id| self.ils().patron(id));

        self.patron_status_response(patron.as_ref(), &lang, msg)
    }

    pub fn handle_block_patron(&mut self, msg: &Message) -> Message {
        let card_retained = msg.fixed_fields()[0].value() == "Y";
        let blocked_card_msg = msg.get_field_value("AL").unwrap_or("");

        self.ils().check_inst_id(
            msg.get_field_value("AO").unwrap_or(""),
            "handle_block_patron",
        );

        let patron = match msg.get_field_value("AA") {
            Some(id) => self.ils().block_patron(id, card_retained, blocked_card_msg),
            None => None,
        };

        // The response to Block Patron is a Patron Status response.
        // This request has no language fixed field, so send
        // "unspecified" and let the terminal cope.
        self.patron_status_response(patron.as_ref(), "000", msg)
    }

    /// Patron Status response builder shared by the Patron Status and
    /// Block Patron handlers.
    pub(crate) fn patron_status_response(
        &self,
        patron: Option<&Patron>,
        lang: &str,
        msg: &Message,
    ) -> Message {
        let now = util::sip_date_now();
        let mut resp;

        if let Some(patron) = patron {
            resp = Message::from_ff_values(
                &spec::M_PATRON_STATUS_RESP,
                &[&patron_status_string(patron), lang, &now],
            )
            .unwrap();

            // The patron ID the terminal scanned resolved, but reply
            // with the one the ILS returned, just in case.
            resp.add_field("AE", &patron.name);
            resp.add_field("AA", &patron.id);

            if self.protocol_version() == ProtocolVersion::V2 {
                resp.add_field("BL", "Y");

                // Without the patron password field we don't know
                // whether the password is valid, so leave CQ out.
                if let Some(pwd) = msg.get_field_value("AD") {
                    resp.add_field(
                        "CQ",
                        util::sip_bool(self.ils().check_password(&patron.id, pwd)),
                    );
                }

                resp.maybe_add_field("BH", patron.currency.as_deref());

                if let Some(amount) = patron.fee_amount {
                    resp.add_field("BV", &format!("{amount:.2}"));
                }
            }

            resp.maybe_add_field("AF", patron.screen_msg.as_deref());
            resp.maybe_add_field("AG", patron.print_line.as_deref());
        } else {
            resp = Message::from_ff_values(
                &spec::M_PATRON_STATUS_RESP,
                &[INVALID_PATRON_STATUS, lang, &now],
            )
            .unwrap();

            resp.add_field("AE", "");

            // The patron ID is invalid, but it's a required field, so
            // echo it back.
            resp.add_field("AA", msg.get_field_value("AA").unwrap_or(""));

            if self.protocol_version() == ProtocolVersion::V2 {
                resp.add_field("BL", "N");
            }
        }

        resp.add_field("AO", msg.get_field_value("AO").unwrap_or(""));

        resp
    }

    pub fn handle_patron_info(&mut self, msg: &Message) -> Message {
        let lang = msg.fixed_fields()[0].value().to_string();
        let summary = msg.fixed_fields()[2].value().to_string();

        self.ils().check_inst_id(
            msg.get_field_value("AO").unwrap_or(""),
            "handle_patron_info",
        );

        let patron = msg
            .get_field_value("AA")
            .and_then(|id| self.ils().patron(id));

        let now = util::sip_date_now();
        let mut resp;

        if let Some(ref patron) = patron {
            resp = Message::from_ff_values(
                &spec::M_PATRON_INFO_RESP,
                &[
                    &patron_status_string(patron),
                    &lang,
                    &now,
                    &util::sip_count4(patron.hold_items.len()),
                    &util::sip_count4(patron.overdue_items.len()),
                    &util::sip_count4(patron.charged_items.len()),
                    &util::sip_count4(patron.fine_items.len()),
                    &util::sip_count4(patron.recall_items.len()),
                    &util::sip_count4(patron.unavail_hold_items.len()),
                ],
            )
            .unwrap();

            resp.add_field("AA", &patron.id);
            resp.add_field("AE", &patron.name);
            resp.maybe_add_field("BD", patron.address.as_deref());
            resp.maybe_add_field("BE", patron.email_addr.as_deref());
            resp.maybe_add_field("BF", patron.home_phone.as_deref());

            self.add_summary_items(&mut resp, patron, &summary, msg);

            resp.add_field("BL", "Y");

            if let Some(pwd) = msg.get_field_value("AD") {
                resp.add_field(
                    "CQ",
                    util::sip_bool(self.ils().check_password(&patron.id, pwd)),
                );
            }

            resp.maybe_add_field("PB", patron.birthdate.as_deref());
            resp.maybe_add_field("PC", patron.patron_class.as_deref());
            resp.maybe_add_field("AF", patron.screen_msg.as_deref());
            resp.maybe_add_field("AG", patron.print_line.as_deref());
        } else {
            // Unknown patron: no privileges, no items, no name.
            resp = Message::from_ff_values(
                &spec::M_PATRON_INFO_RESP,
                &[
                    INVALID_PATRON_STATUS,
                    &lang,
                    &now,
                    "0000",
                    "0000",
                    "0000",
                    "0000",
                    "0000",
                    "0000",
                ],
            )
            .unwrap();

            resp.add_field("AE", "");
            resp.add_field("AA", msg.get_field_value("AA").unwrap_or(""));
            resp.add_field("BL", "N");
        }

        resp.add_field("AO", msg.get_field_value("AO").unwrap_or(""));

        resp
    }

    /// Append the detail list selected by the summary fixed field of a
    /// Patron Information request.
    ///
    /// At most one of the first six summary positions may carry a 'Y'.
    /// BP/BQ window the list with 1-based inclusive indexes.
    fn add_summary_items(&self, resp: &mut Message, patron: &Patron, summary: &str, msg: &Message) {
        let position = match summary.find('Y') {
            Some(p) => p,
            None => return, // no details requested
        };

        let (field, list) = match patron.summary_list(position) {
            Some(entry) => entry,
            None => {
                log::warn!("{self} unsupported summary position {position} in '{summary}'");
                return;
            }
        };

        let start = msg
            .get_field_value("BP")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(1)
            .max(1);

        let end = msg
            .get_field_value("BQ")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(list.len());

        for value in list.iter().skip(start - 1).take(end.saturating_sub(start - 1)) {
            resp.add_field(field.code, value);
        }
    }

    pub fn handle_patron_enable(&mut self, msg: &Message) -> Message {
        let patron_id = msg.get_field_value("AA").unwrap_or("");
        let patron_pwd = msg.get_field_value("AD");

        self.ils().check_inst_id(
            msg.get_field_value("AO").unwrap_or(""),
            "handle_patron_enable",
        );

        let pwd_ok = match patron_pwd {
            Some(pwd) => self.ils().check_password(patron_id, pwd),
            None => true,
        };

        let patron = match pwd_ok {
            true => self.ils().enable_patron(patron_id),
            false => None,
        };

        let now = util::sip_date_now();
        let mut resp;

        match patron {
            Some(patron) => {
                resp = Message::from_ff_values(
                    &spec::M_PATRON_ENABLE_RESP,
                    &[&patron_status_string(&patron), &patron.language, &now],
                )
                .unwrap();

                resp.add_field("AA", &patron.id);
                resp.add_field("AE", &patron.name);
                resp.add_field("CQ", "Y");
                resp.add_field("BL", "Y");
                resp.maybe_add_field("AF", patron.screen_msg.as_deref());
                resp.maybe_add_field("AG", patron.print_line.as_deref());
            }
            None => {
                // Unknown patron, or the password didn't match.
                resp = Message::from_ff_values(
                    &spec::M_PATRON_ENABLE_RESP,
                    &[INVALID_PATRON_STATUS, "000", &now],
                )
                .unwrap();

                resp.add_field("AA", patron_id);
                resp.add_field("AE", "");
                resp.add_field("BL", "N");
                resp.add_field("CQ", "N");
            }
        }

        resp.add_field("AO", msg.get_field_value("AO").unwrap_or(""));

        resp
    }
}

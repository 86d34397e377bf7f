use crate::ils::Capability;
use crate::session::Session;
use sipcodec::spec::ProtocolVersion;
use sipcodec::{spec, util, Message};

impl Session {
    pub fn handle_checkout(&mut self, msg: &Message) -> Message {
        let sc_renewal_policy = msg.fixed_fields()[0].value() == "Y";
        let no_block = msg.fixed_fields()[1].value() == "Y";
        let trans_date = msg.fixed_fields()[2].value().to_string();
        let nb_due_date = msg.fixed_fields()[3].value().to_string();

        self.ils()
            .check_inst_id(msg.get_field_value("AO").unwrap_or(""), "handle_checkout");

        let patron_id = msg.get_field_value("AA").unwrap_or("").to_string();
        let item_id = msg.get_field_value("AB").unwrap_or("").to_string();

        log::info!("{self} checkout of item '{item_id}' to patron '{patron_id}'");

        let status = if no_block {
            // Off-line transaction.  It gets recorded, but it does not
            // necessarily correspond to what actually happened, so the
            // circulation data may now be out of sync with the world.
            self.ils().checkout_no_block(
                &patron_id,
                &item_id,
                sc_renewal_policy,
                &trans_date,
                &nb_due_date,
            )
        } else {
            self.ils().checkout(&patron_id, &item_id, sc_renewal_policy)
        };

        let institution = self.ils().institution().to_string();
        let now = util::sip_date_now();
        let mut resp;

        if status.ok && status.item.is_some() {
            let item = status.item.as_ref().unwrap();

            resp = Message::from_ff_values(
                &spec::M_CHECKOUT_RESP,
                &[
                    "1",
                    util::sip_bool(status.renew_ok),
                    self.magnetic_media_value(Some(item)),
                    // The obsolete 'U' value for desensitize is never
                    // sent.
                    util::sip_bool(status.desensitize),
                    &now,
                ],
            )
            .unwrap();

            resp.add_field("AO", &institution);
            resp.add_field("AA", &patron_id);
            resp.add_field("AB", &item_id);
            resp.add_field("AJ", &item.title);
            resp.add_field("AH", item.due_date.as_deref().unwrap_or(""));

            if self.protocol_version() == ProtocolVersion::V2 {
                if self.ils().supports(Capability::SecurityInhibit) {
                    resp.add_field("CI", util::sip_bool(status.security_inhibit));
                }

                resp.maybe_add_field("CK", item.sip_media_type.as_deref());
                resp.maybe_add_field("CH", item.sip_item_properties.as_deref());

                // A checkout carries the fee quartet only for a
                // nonzero fee; a fee recorded as 0.00 is left off.
                if status.fee_amount.unwrap_or(0.0) > 0.0 {
                    self.add_fee_fields(
                        &mut resp,
                        status.fee_amount,
                        status.currency.as_deref(),
                        status.fee_type.as_deref(),
                        status.transaction_id.as_deref(),
                    );
                }
            }
        } else {
            if status.ok {
                log::error!("{self} ILS reported a checkout with no item; failing the request");
            }

            // Not ok: no renewal, unknown magnetic media, no
            // desensitize.
            resp = Message::from_ff_values(&spec::M_CHECKOUT_RESP, &["0", "N", "U", "N", &now])
                .unwrap();

            resp.add_field("AO", &institution);
            resp.add_field("AA", &patron_id);
            resp.add_field("AB", &item_id);

            // Provide the title when the item at least resolved.
            resp.add_field(
                "AJ",
                status.item.as_ref().map(|i| i.title.as_str()).unwrap_or(""),
            );

            // Nothing was checked out, so nothing is due.
            resp.add_field("AH", "");

            if self.protocol_version() == ProtocolVersion::V2 {
                resp.add_field("BL", util::sip_bool(status.patron.is_some()));

                if let (Some(patron), Some(pwd)) =
                    (status.patron.as_ref(), msg.get_field_value("AD"))
                {
                    resp.add_field(
                        "CQ",
                        util::sip_bool(self.ils().check_password(&patron.id, pwd)),
                    );
                }
            }
        }

        resp.maybe_add_field("AF", status.screen_msg.as_deref());
        resp.maybe_add_field("AG", status.print_line.as_deref());

        resp
    }
}

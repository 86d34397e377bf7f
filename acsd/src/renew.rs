use crate::ils::{Capability, RenewParams};
use crate::session::Session;
use sipcodec::{spec, util, Message};

impl Session {
    pub fn handle_renew(&mut self, msg: &Message) -> Message {
        let third_party = msg.fixed_fields()[0].value() == "Y";
        let no_block = msg.fixed_fields()[1].value() == "Y";
        let nb_due_date = msg.fixed_fields()[3].value().to_string();

        self.ils()
            .check_inst_id(msg.get_field_value("AO").unwrap_or(""), "handle_renew");

        if no_block {
            log::warn!("{self} received a no-block renewal");
        }

        let patron_id = msg.get_field_value("AA").unwrap_or("").to_string();
        let item_id = msg.get_field_value("AB").unwrap_or("").to_string();
        let title_id = msg.get_field_value("AJ").unwrap_or("").to_string();

        let params = RenewParams {
            patron_id: patron_id.clone(),
            patron_pwd: msg.get_field_value("AD").map(str::to_string),
            item_id: msg.get_field_value("AB").map(str::to_string),
            title_id: msg.get_field_value("AJ").map(str::to_string),
            no_block,
            nb_due_date,
            third_party,
            item_props: msg.get_field_value("CH").map(str::to_string),
            fee_ack: msg.get_field_value("BO") == Some("Y"),
        };

        let status = self.ils().renew(&params);

        let now = util::sip_date_now();
        let mut resp;

        if status.renewal_ok && status.item.is_some() && status.patron.is_some() {
            let item = status.item.as_ref().unwrap();
            let patron = status.patron.as_ref().unwrap();

            resp = Message::from_ff_values(
                &spec::M_RENEW_RESP,
                &[
                    "1",
                    util::sip_bool(status.renewal_ok),
                    self.magnetic_media_value(Some(item)),
                    util::sip_bool(status.desensitize),
                    &now,
                ],
            )
            .unwrap();

            resp.add_field("AA", &patron.id);
            resp.add_field("AB", &item.id);
            resp.add_field("AJ", &item.title);
            resp.add_field("AH", item.due_date.as_deref().unwrap_or(""));

            if self.ils().supports(Capability::SecurityInhibit) {
                resp.add_field("CI", util::sip_bool(status.security_inhibit));
            }

            resp.add_field("CK", item.sip_media_type.as_deref().unwrap_or(""));
            resp.maybe_add_field("CH", item.sip_item_properties.as_deref());
        } else {
            // Renewal failed: not ok, not renewed, unknown media, no
            // desensitize.
            resp = Message::from_ff_values(&spec::M_RENEW_RESP, &["0", "N", "U", "N", &now])
                .unwrap();

            // Use the ILS values where the patron or item resolved,
            // otherwise echo back what the terminal sent.
            resp.add_field(
                "AA",
                status
                    .patron
                    .as_ref()
                    .map(|p| p.id.as_str())
                    .unwrap_or(&patron_id),
            );
            resp.add_field(
                "AB",
                status
                    .item
                    .as_ref()
                    .map(|i| i.id.as_str())
                    .unwrap_or(&item_id),
            );
            resp.add_field(
                "AJ",
                status
                    .item
                    .as_ref()
                    .map(|i| i.title.as_str())
                    .unwrap_or(&title_id),
            );
            resp.add_field(
                "AH",
                status
                    .item
                    .as_ref()
                    .and_then(|i| i.due_date.as_deref())
                    .unwrap_or(""),
            );
        }

        self.add_fee_fields(
            &mut resp,
            status.fee_amount,
            status.currency.as_deref(),
            status.fee_type.as_deref(),
            status.transaction_id.as_deref(),
        );

        resp.add_field("AO", self.ils().institution());
        resp.maybe_add_field("AF", status.screen_msg.as_deref());
        resp.maybe_add_field("AG", status.print_line.as_deref());

        resp
    }

    pub fn handle_renew_all(&mut self, msg: &Message) -> Message {
        self.ils()
            .check_inst_id(msg.get_field_value("AO").unwrap_or(""), "handle_renew_all");

        let patron_id = msg.get_field_value("AA").unwrap_or("");
        let patron_pwd = msg.get_field_value("AD");
        let fee_ack = msg.get_field_value("BO") == Some("Y");

        let status = self.ils().renew_all(patron_id, patron_pwd, fee_ack);

        let mut resp = Message::from_ff_values(
            &spec::M_RENEW_ALL_RESP,
            &[
                util::num_bool(status.ok),
                &util::sip_count4(status.renewed.len()),
                &util::sip_count4(status.unrenewed.len()),
                &util::sip_date_now(),
            ],
        )
        .unwrap();

        resp.add_field("AO", self.ils().institution());

        for item_id in status.renewed.iter() {
            resp.add_field("BM", item_id);
        }

        for item_id in status.unrenewed.iter() {
            resp.add_field("BN", item_id);
        }

        resp.maybe_add_field("AF", status.screen_msg.as_deref());
        resp.maybe_add_field("AG", status.print_line.as_deref());

        resp
    }
}

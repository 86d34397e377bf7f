use crate::session::Session;
use sipcodec::{spec, util, Message};

impl Session {
    pub fn handle_item_info(&mut self, msg: &Message) -> Message {
        self.ils()
            .check_inst_id(msg.get_field_value("AO").unwrap_or(""), "handle_item_info");

        let item_id = msg.get_field_value("AB").unwrap_or("");
        let now = util::sip_date_now();

        let item = match self.ils().item(item_id) {
            Some(item) => item,
            None => {
                // "Other" circulation status, "other" security marker,
                // "unknown" fee type.
                let mut resp =
                    Message::from_ff_values(&spec::M_ITEM_INFO_RESP, &["01", "01", "01", &now])
                        .unwrap();

                // Echo back the invalid item barcode.
                resp.add_field("AB", item_id);
                // Title is required, but there is none to send.
                resp.add_field("AJ", "");

                return resp;
            }
        };

        let mut resp = Message::from_ff_values(
            &spec::M_ITEM_INFO_RESP,
            &[
                &item.circulation_status,
                &item.security_marker,
                &item.fee_type,
                &now,
            ],
        )
        .unwrap();

        resp.add_field("AB", &item.id);
        resp.add_field("AJ", &item.title);
        resp.maybe_add_field("CK", item.sip_media_type.as_deref());
        resp.maybe_add_field("AQ", Some(&item.permanent_location));
        resp.maybe_add_field("AP", item.current_location.as_deref());
        resp.maybe_add_field("CH", item.sip_item_properties.as_deref());

        if item.fee != 0.0 {
            resp.add_field("BH", item.fee_currency.as_deref().unwrap_or(""));
            resp.add_field("BV", &format!("{:.2}", item.fee));
        }

        resp.maybe_add_field("BG", item.owner.as_deref());

        if item.hold_queue_length > 0 {
            resp.add_field("CF", &item.hold_queue_length.to_string());
        }

        if let Some(date) = item.due_date.as_deref() {
            resp.add_field("AH", date);
        }
        if let Some(date) = item.recall_date.as_deref() {
            resp.add_field("CJ", date);
        }
        if let Some(date) = item.hold_pickup_date.as_deref() {
            resp.add_field("CM", date);
        }

        resp.maybe_add_field("AF", item.screen_msg.as_deref());
        resp.maybe_add_field("AG", item.print_line.as_deref());

        resp
    }

    pub fn handle_item_status_update(&mut self, msg: &Message) -> Message {
        self.ils().check_inst_id(
            msg.get_field_value("AO").unwrap_or(""),
            "handle_item_status_update",
        );

        let item_id = msg.get_field_value("AB").unwrap_or("");
        let item_props = msg.get_field_value("CH").unwrap_or("");
        let now = util::sip_date_now();

        match self.ils().item(item_id) {
            None => {
                let mut resp =
                    Message::from_ff_values(&spec::M_ITEM_STATUS_UPDATE_RESP, &["0", &now])
                        .unwrap();

                resp.add_field("AB", item_id);
                resp
            }
            Some(item) => {
                let status = self.ils().item_status_update(&item.id, item_props);

                let mut resp = Message::from_ff_values(
                    &spec::M_ITEM_STATUS_UPDATE_RESP,
                    &[util::num_bool(status.ok), &now],
                )
                .unwrap();

                resp.add_field("AB", &item.id);
                resp.add_field("AJ", &item.title);
                resp.maybe_add_field("CH", item.sip_item_properties.as_deref());
                // Transaction text exists on this branch only.
                resp.maybe_add_field("AF", status.screen_msg.as_deref());
                resp.maybe_add_field("AG", status.print_line.as_deref());

                resp
            }
        }
    }
}

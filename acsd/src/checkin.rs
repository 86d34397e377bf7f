use crate::session::Session;
use sipcodec::spec::ProtocolVersion;
use sipcodec::{spec, util, Message};

impl Session {
    pub fn handle_checkin(&mut self, msg: &Message) -> Message {
        let no_block = msg.fixed_fields()[0].value() == "Y";
        let trans_date = msg.fixed_fields()[1].value().to_string();
        let return_date = msg.fixed_fields()[2].value().to_string();

        let current_location = msg.get_field_value("AP").map(str::to_string);
        let inst_id = msg.get_field_value("AO").unwrap_or("").to_string();
        let item_id = msg.get_field_value("AB").unwrap_or("").to_string();
        let item_props = msg.get_field_value("CH").map(str::to_string);
        let cancel = msg.get_field_value("BI") == Some("Y");

        self.ils().check_inst_id(&inst_id, "handle_checkin");

        log::info!("{self} checkin of item '{item_id}'");

        let status = if no_block {
            self.ils()
                .checkin_no_block(&item_id, &trans_date, &return_date, item_props.as_deref())
        } else {
            self.ils().checkin(
                &item_id,
                current_location.as_deref(),
                &return_date,
                item_props.as_deref(),
                cancel,
            )
        };

        let item = status.item.as_ref();

        let mut resp = Message::from_ff_values(
            &spec::M_CHECKIN_RESP,
            &[
                util::num_bool(status.ok),
                util::sip_bool(status.resensitize),
                self.magnetic_media_value(item),
                util::sip_bool(status.alert),
                &util::sip_date_now(),
            ],
        )
        .unwrap();

        resp.add_field("AO", &inst_id);
        resp.add_field("AB", &item_id);

        // Permanent location is required, so it goes out empty when
        // the item did not resolve.
        resp.add_field(
            "AQ",
            item.map(|i| i.permanent_location.as_str()).unwrap_or(""),
        );
        resp.maybe_add_field("AJ", item.map(|i| i.title.as_str()));

        if self.protocol_version() == ProtocolVersion::V2 {
            resp.maybe_add_field("CL", status.sort_bin.as_deref());

            if let Some(patron) = status.patron.as_ref() {
                resp.add_field("AA", &patron.id);
            }

            if let Some(item) = item {
                resp.maybe_add_field("CK", item.sip_media_type.as_deref());
                resp.maybe_add_field("CH", item.sip_item_properties.as_deref());
            }
        }

        resp.maybe_add_field("AF", status.screen_msg.as_deref());
        resp.maybe_add_field("AG", status.print_line.as_deref());

        resp
    }
}

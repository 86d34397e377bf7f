use crate::ils::{HoldParams, HoldStatus};
use crate::session::Session;
use sipcodec::{spec, util, Message};

impl Session {
    pub fn handle_hold(&mut self, msg: &Message) -> Message {
        let hold_mode = msg.fixed_fields()[0].value().to_string();

        self.ils()
            .check_inst_id(msg.get_field_value("AO").unwrap_or(""), "handle_hold");

        let patron_id = msg.get_field_value("AA").unwrap_or("").to_string();

        let params = HoldParams {
            patron_id: patron_id.clone(),
            patron_pwd: msg.get_field_value("AD").map(str::to_string),
            item_id: msg.get_field_value("AB").map(str::to_string),
            title_id: msg.get_field_value("AJ").map(str::to_string),
            expiry_date: msg.get_field_value("BW").map(str::to_string),
            pickup_location: msg.get_field_value("BS").map(str::to_string),
            hold_type: msg.get_field_value("BY").map(str::to_string),
            fee_ack: msg.get_field_value("BO") == Some("Y"),
        };

        let status = match hold_mode.as_str() {
            "+" => self.ils().add_hold(&params),
            "-" => self.ils().cancel_hold(&params),
            "*" => self.ils().alter_hold(&params),
            mode => {
                log::warn!("{self} unrecognized hold mode '{mode}'");

                HoldStatus {
                    screen_msg: Some("System error; please contact library staff".to_string()),
                    ..HoldStatus::default()
                }
            }
        };

        let mut resp = Message::from_ff_values(
            &spec::M_HOLD_RESP,
            &[
                util::num_bool(status.ok),
                util::sip_bool(status.item_available),
                &util::sip_date_now(),
            ],
        )
        .unwrap();

        if status.ok {
            resp.add_field(
                "AA",
                status
                    .patron
                    .as_ref()
                    .map(|p| p.id.as_str())
                    .unwrap_or(&patron_id),
            );

            resp.maybe_add_field("BW", status.expiration_date.as_deref());

            if let Some(position) = status.queue_position {
                resp.add_field("BR", &position.to_string());
            }

            resp.maybe_add_field("BS", status.pickup_location.as_deref());
            resp.maybe_add_field("AB", status.item.as_ref().map(|i| i.id.as_str()));
            resp.maybe_add_field("AJ", status.item.as_ref().map(|i| i.title.as_str()));
        } else {
            // The hold failed; the patron ID is still required, so
            // echo it back.
            resp.add_field("AA", &patron_id);
        }

        resp.add_field("AO", self.ils().institution());
        resp.maybe_add_field("AF", status.screen_msg.as_deref());
        resp.maybe_add_field("AG", status.print_line.as_deref());

        resp
    }
}

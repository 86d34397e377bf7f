use crate::ils::FeePayment;
use crate::session::Session;
use sipcodec::{spec, util, Message};

impl Session {
    pub fn handle_fee_paid(&mut self, msg: &Message) -> Message {
        let fixed = msg.fixed_fields();
        let fee_type = fixed[1].value().to_string();
        let pay_type = fixed[2].value().to_string();
        let currency = fixed[3].value().to_string();

        let inst_id = msg.get_field_value("AO").unwrap_or("").to_string();
        let patron_id = msg.get_field_value("AA").unwrap_or("").to_string();

        self.ils().check_inst_id(&inst_id, "handle_fee_paid");

        let payment = FeePayment {
            patron_id: patron_id.clone(),
            patron_pwd: msg.get_field_value("AD").map(str::to_string),
            fee_amount: msg.get_field_value("BV").unwrap_or("").to_string(),
            fee_type,
            pay_type,
            currency,
            fee_id: msg.get_field_value("CG").map(str::to_string),
            transaction_id: msg.get_field_value("BK").map(str::to_string),
        };

        let status = self.ils().pay_fee(&payment);

        let mut resp = Message::from_ff_values(
            &spec::M_FEE_PAID_RESP,
            &[util::sip_bool(status.ok), &util::sip_date_now()],
        )
        .unwrap();

        resp.add_field("AO", &inst_id);
        resp.add_field("AA", &patron_id);
        resp.maybe_add_field("BK", status.transaction_id.as_deref());
        resp.maybe_add_field("AF", status.screen_msg.as_deref());
        resp.maybe_add_field("AG", status.print_line.as_deref());

        resp
    }
}

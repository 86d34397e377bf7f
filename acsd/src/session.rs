use crate::conf;
use crate::conf::{Account, Config};
use crate::ils::{Ils, Item};
use sipcodec::spec::ProtocolVersion;
use sipcodec::{checksum, spec, util, Connection, Error, Message};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/* --------------------------------------------------------- */
// By order of appearance in the SUPPORTED_MESSAGES string:
// patron status request
// checkout
// checkin
// block patron
// sc/acs status
// request sc/acs resend
// login
// patron information
// end patron session
// fee paid
// item information
// item status update
// patron enable
// hold
// renew
// renew all
const SUPPORTED_MESSAGES: &str = "YYYYYYYYYYYYYYYY";
/* --------------------------------------------------------- */

// SC Status fixed field status codes.
const SC_STATUS_OK: &str = "0";
const SC_STATUS_PAPER: &str = "1";
const SC_STATUS_SHUTDOWN: &str = "2";

// Message codes dispatched before a successful login.
const PRE_LOGIN_CODES: &[&str] = &["93", "99"];

/// Manages the SIP side of a single client connection.
///
/// All connection state lives here: the negotiated protocol version,
/// the active account, the error-detection envelope, and the last
/// response for resend arbitration.  A Session is owned by exactly
/// one connection task and never shared.
pub struct Session {
    config: Arc<Config>,

    ils: Arc<dyn Ils>,

    /// If true, the server is shutting down, so we should exit.
    shutdown: Arc<AtomicBool>,

    /// Terminal account, set after the client logs in.
    account: Option<Account>,

    /// Starts at 1.00; upgraded by Login and by SC Status.
    protocol_version: ProtocolVersion,

    /// True once the client has sent a checksummed frame or demanded
    /// a resend.
    error_detection: bool,

    /// Sequence number of the current inbound frame, echoed in the
    /// response trailer.
    seq: Option<char>,

    /// The exact frame most recently sent, for resend arbitration.
    last_response: Option<String>,
}

impl Session {
    pub fn new(config: Arc<Config>, ils: Arc<dyn Ils>, shutdown: Arc<AtomicBool>) -> Session {
        Session {
            config,
            ils,
            shutdown,
            account: None,
            protocol_version: ProtocolVersion::V1,
            error_detection: false,
            seq: None,
            last_response: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn ils(&self) -> &dyn Ils {
        self.ils.as_ref()
    }

    pub fn protocol_version(&self) -> ProtocolVersion {
        self.protocol_version
    }

    /// True if our SIP client has successfully logged in.
    pub fn has_account(&self) -> bool {
        self.account.is_some()
    }

    pub fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    fn delimiter(&self) -> char {
        self.config.delimiter
    }

    /// Wait for SIP requests in a loop and send replies.
    ///
    /// Exits when the client disconnects, the shutdown signal is set,
    /// the configured idle timeout elapses, or on unrecoverable error.
    pub fn run(&mut self, connection: &mut Connection) -> Result<(), String> {
        log::debug!("{self} starting");

        let mut idle: u64 = 0;

        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                log::debug!("{self} shutdown notice received, exiting listen loop");
                break;
            }

            let frame = match connection.recv_frame(conf::SHUTDOWN_POLL_INTERVAL) {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    idle += conf::SHUTDOWN_POLL_INTERVAL;

                    let timeout = u64::from(self.config.timeout);
                    if timeout > 0 && idle >= timeout {
                        log::info!("{self} idle for {idle}s, disconnecting");
                        break;
                    }

                    continue;
                }
                Err(Error::NoResponseError) => {
                    // There is no disconnect message in SIP; the
                    // client just closes the socket.
                    log::debug!("{self} client disconnected");
                    break;
                }
                Err(e) => return Err(format!("{self} recv failed: {e}")),
            };

            idle = 0;

            let (code, response) = self.handle_frame(&frame, None);

            match response {
                Some(response) => {
                    connection
                        .send_frame(&response)
                        .map_err(|e| format!("{self} send failed: {e}"))?;

                    log::debug!("{self} replied to message '{code}'");
                }
                None => log::debug!("{self} no response for message '{code}'"),
            }
        }

        log::info!("{self} session ended");

        Ok(())
    }

    /// Process one inbound frame.
    ///
    /// Returns the two-character code the frame was recognized as,
    /// plus the response frame to transmit, if any.  Frames that fail
    /// checksum verification are answered with a Request SC Resend;
    /// malformed or gated frames produce no response at all.  The
    /// connection stays up in every case.
    ///
    /// When `expect` is set, any message other than the expected code
    /// is acknowledged without being dispatched.  A Request ACS Resend
    /// is always honored.
    pub fn handle_frame(&mut self, frame: &str, expect: Option<&str>) -> (String, Option<String>) {
        if !frame.is_ascii() {
            log::warn!("{self} discarding non-ASCII frame");
            return (String::new(), None);
        }

        // A bare resend request carries no trailer (a checksum would
        // be self-defeating on the message that arbitrates checksum
        // failures), but only error-detecting clients send one.
        if frame == spec::M_REQUEST_ACS_RESEND.code {
            self.error_detection = true;
            return (frame.to_string(), Some(self.resend_last()));
        }

        let inner = match self.open_envelope(frame) {
            Ok(inner) => inner,
            Err(response) => {
                // Checksum failure; ask the SC to retransmit.
                return (spec::M_REQUEST_SC_RESEND.code.to_string(), Some(response));
            }
        };

        if inner.len() < 2 {
            log::warn!("{self} discarding incomplete frame: '{inner}'");
            return (String::new(), None);
        }

        let code = inner[..2].to_string();

        // A 2.00-style Login arrives before the client has had any
        // chance to negotiate versions, but it proves the client
        // speaks 2.00, so upgrade now, ahead of the schema lookup.
        if code == spec::M_LOGIN.code && self.protocol_version == ProtocolVersion::V1 {
            log::info!("{self} Login received, upgrading session to protocol 2.00");
            self.protocol_version = ProtocolVersion::V2;
        }

        if let Some(expected) = expect {
            if code != expected && code != spec::M_REQUEST_ACS_RESEND.code {
                log::warn!("{self} expected message '{expected}', received '{code}'");
                return (code, None);
            }
        }

        if code == spec::M_REQUEST_ACS_RESEND.code {
            return (code, Some(self.resend_last()));
        }

        if !self.has_account() && !PRE_LOGIN_CODES.contains(&code.as_str()) {
            log::warn!("{self} message '{code}' received before login; ignoring");
            return (code, None);
        }

        let msg = match Message::from_sip(inner, self.protocol_version, self.delimiter()) {
            Ok(msg) => msg,
            Err(e) => {
                log::warn!("{self} discarding frame: {e}");
                return (code, None);
            }
        };

        log::info!("{self} INBOUND: {}", msg.to_sip_redacted(self.delimiter()));

        let resp = self.dispatch(&msg);

        log::info!("{self} OUTBOUND: {}", resp.to_sip_redacted(self.delimiter()));

        let sealed = self.seal(resp.to_sip(self.delimiter()));

        (code, Some(sealed))
    }

    /// Apply the inbound half of the error-detection envelope,
    /// returning the frame with any trailer verified and stripped.
    ///
    /// Err carries the ready-to-send Request SC Resend response for a
    /// frame whose checksum did not verify.
    fn open_envelope<'a>(&mut self, frame: &'a str) -> Result<&'a str, String> {
        let len = frame.len();

        if len > 11 && &frame[len - 9..len - 7] == "AY" {
            self.error_detection = true;

            if !checksum::verify(frame) {
                log::warn!("{self} checksum failed on frame '{frame}'");

                let resp = spec::M_REQUEST_SC_RESEND.code.to_string();
                self.last_response = Some(resp.clone());
                return Err(resp);
            }

            self.seq = frame[len - 7..].chars().next();
            return Ok(&frame[..len - 9]);
        }

        if self.error_detection {
            // The client was using error detection and stopped.
            // Complain, then process the frame anyway.
            log::warn!("{self} received frame without error detection trailer: '{frame}'");
            self.error_detection = false;
            self.seq = None;
        }

        Ok(frame)
    }

    /// Attach the error-detection trailer when enabled, reusing the
    /// inbound sequence number, and remember the frame for resend
    /// arbitration.
    fn seal(&mut self, mut text: String) -> String {
        if self.error_detection {
            if let Some(seq) = self.seq {
                text = checksum::with_trailer(&text, seq);
            }
        }

        self.last_response = Some(text.clone());
        text
    }

    /// Resend arbitration.
    ///
    /// Retransmits the most recent response without altering it, so
    /// repeated resend requests yield identical frames.  A resent
    /// message carries no sequence number, hence the trailer is cut.
    fn resend_last(&self) -> String {
        let last = match self.last_response.as_ref() {
            Some(last) => last,
            None => {
                // Nothing has been sent yet; ask the SC to resend
                // instead.
                log::warn!("{self} resend requested before any response was sent");
                return spec::M_REQUEST_SC_RESEND.code.to_string();
            }
        };

        if last.len() < 9 || &last[last.len() - 9..last.len() - 7] != "AY" {
            last.clone()
        } else {
            last[..last.len() - 9].to_string()
        }
    }

    /// Route a parsed request to its handler.
    ///
    /// Every handler produces exactly one response, including on ILS
    /// failure, to keep the terminal's request/response pairing
    /// intact.
    fn dispatch(&mut self, msg: &Message) -> Message {
        match msg.spec().code {
            "01" => self.handle_block_patron(msg),
            "09" => self.handle_checkin(msg),
            "11" => self.handle_checkout(msg),
            "15" => self.handle_hold(msg),
            "17" => self.handle_item_info(msg),
            "19" => self.handle_item_status_update(msg),
            "23" => self.handle_patron_status(msg),
            "25" => self.handle_patron_enable(msg),
            "29" => self.handle_renew(msg),
            "35" => self.handle_end_patron_session(msg),
            "37" => self.handle_fee_paid(msg),
            "63" => self.handle_patron_info(msg),
            "65" => self.handle_renew_all(msg),
            "93" => self.handle_login(msg),
            "99" => self.handle_sc_status(msg),
            code => {
                // Unreachable while the dispatch table matches the
                // schema registry; answer something rather than
                // nothing if they ever diverge.
                log::error!("{self} no handler for message '{code}'");
                Message::new(&spec::M_REQUEST_SC_RESEND, vec![], vec![])
            }
        }
    }

    fn handle_login(&mut self, msg: &Message) -> Message {
        self.account = None;
        let mut login_ok = false;

        let uid_algo = msg.fixed_fields()[0].value();
        let pwd_algo = msg.fixed_fields()[1].value();

        if uid_algo != "0" || pwd_algo != "0" {
            log::error!(
                "{self} login with unsupported non-plaintext algorithm: uid='{uid_algo}' pwd='{pwd_algo}'"
            );
        } else if let Some(username) = msg.get_field_value("CN") {
            let password = msg.get_field_value("CO").unwrap_or("");

            if let Some(account) = self.config.get_account(username) {
                if timing_safe_eq(account.password().as_bytes(), password.as_bytes()) {
                    login_ok = true;
                    self.account = Some(account.clone());
                } else {
                    log::warn!("Invalid password for terminal login '{username}'");
                }
            } else {
                log::warn!("No such terminal account: {username}");
            }
        } else {
            log::warn!("Login called with no username");
        }

        Message::from_ff_values(&spec::M_LOGIN_RESP, &[util::num_bool(login_ok)]).unwrap()
    }

    fn handle_sc_status(&mut self, msg: &Message) -> Message {
        let status = msg.fixed_fields()[0].value().to_string();
        let sc_version = msg.fixed_fields()[2].value();

        let version = ProtocolVersion::from_sc_status(sc_version);
        if version != self.protocol_version {
            log::info!("{self} setting protocol version to {version}");
            self.protocol_version = version;
        }

        match status.as_str() {
            SC_STATUS_OK => {}
            SC_STATUS_PAPER => log::warn!("{self} terminal reports it is out of paper"),
            SC_STATUS_SHUTDOWN => log::warn!("{self} terminal reports it is shutting down"),
            other => log::warn!("{self} terminal reports unknown status '{other}'"),
        }

        self.acs_status(None, None)
    }

    /// Compose the ACS Status response advertising server policy and
    /// capabilities.
    fn acs_status(&self, screen_msg: Option<&str>, print_line: Option<&str>) -> Message {
        let timeout = format!("{:03}", self.config.timeout.min(999));
        let retries = format!("{:03}", self.config.retries.min(999));

        let mut resp = Message::from_ff_values(
            &spec::M_ACS_STATUS,
            &[
                "Y", // on-line
                util::sip_bool(self.ils.checkin_ok()),
                util::sip_bool(self.ils.checkout_ok()),
                util::sip_bool(self.config.renewal),
                util::sip_bool(self.ils.status_update_ok()),
                util::sip_bool(self.ils.offline_ok()),
                &timeout,
                &retries,
                &util::sip_date_now(),
                self.protocol_version.as_str(),
            ],
        )
        .unwrap();

        let institution = match self.account.as_ref() {
            Some(account) => account.institution().to_string(),
            None => self.ils.institution().to_string(),
        };

        resp.add_field("AO", &institution);

        if self.protocol_version == ProtocolVersion::V2 {
            resp.add_field("BX", SUPPORTED_MESSAGES);
        }

        resp.maybe_add_field("AF", screen_msg);

        // The print line is cut down to what the terminal can render.
        let width = self.account.as_ref().and_then(|a| a.print_width());
        match (print_line, width) {
            (Some(line), Some(width)) if line.len() > width => {
                log::warn!("{self} print line too long, truncating");
                resp.maybe_add_field("AG", line.get(..width));
            }
            (line, _) => resp.maybe_add_field("AG", line),
        }

        resp
    }

    fn handle_end_patron_session(&mut self, msg: &Message) -> Message {
        let patron_id = msg.get_field_value("AA").unwrap_or("");

        self.ils.check_inst_id(
            msg.get_field_value("AO").unwrap_or(""),
            "handle_end_patron_session",
        );

        let status = self.ils.end_patron_session(patron_id);

        let mut resp = Message::from_ff_values(
            &spec::M_END_PATRON_SESSION_RESP,
            &[util::sip_bool(status.ok), &util::sip_date_now()],
        )
        .unwrap();

        resp.add_field("AO", self.ils.institution());
        resp.add_field("AA", patron_id);
        resp.maybe_add_field("AF", status.screen_msg.as_deref());
        resp.maybe_add_field("AG", status.print_line.as_deref());

        resp
    }

    /// Magnetic media fixed field value for an item, 'U' when the
    /// item is unknown or the ILS does not track magnetic media.
    pub(crate) fn magnetic_media_value(&self, item: Option<&Item>) -> &'static str {
        use crate::ils::Capability;

        match item {
            Some(item) if self.ils.supports(Capability::MagneticMedia) => {
                util::sip_bool(item.magnetic_media)
            }
            _ => "U",
        }
    }

    /// Append the fee quartet when the transaction status carries a
    /// fee amount.
    ///
    /// Checkout additionally requires the amount to be nonzero; that
    /// gate lives at its call site.
    pub(crate) fn add_fee_fields(
        &self,
        resp: &mut Message,
        amount: Option<f64>,
        currency: Option<&str>,
        fee_type: Option<&str>,
        transaction_id: Option<&str>,
    ) {
        if let Some(amount) = amount {
            resp.add_field("BV", &format!("{amount:.2}"));
            resp.maybe_add_field("BH", currency);
            resp.maybe_add_field("BT", fee_type);
            resp.maybe_add_field("BK", transaction_id);
        }
    }
}

/// Password comparison that does not leak a matching prefix length
/// through timing.
fn timing_safe_eq(known: &[u8], given: &[u8]) -> bool {
    let mut diff = known.len() ^ given.len();

    for i in 0..known.len() {
        diff |= usize::from(known[i] ^ given.get(i).copied().unwrap_or(0));
    }

    diff == 0
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref account) = self.account {
            write!(f, "Session({})", account.id())
        } else {
            write!(f, "Session")
        }
    }
}

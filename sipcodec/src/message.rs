use super::error::Error;
use super::schema;
use super::spec;
use super::spec::ProtocolVersion;
use super::util;
use log::{error, warn};
use std::fmt;

const PASSWORD_REDACTED: &str = "REDACTED";

/// Fixed field with spec and value.
///
/// Since fixed fields have specific length requirements, a well-known
/// spec::FixedField is required
#[derive(PartialEq, Debug)]
pub struct FixedField {
    spec: &'static spec::FixedField,
    value: String,
}

impl FixedField {
    pub fn new(spec: &'static spec::FixedField, value: &str) -> Result<Self, Error> {
        if value.len() == spec.length {
            Ok(FixedField {
                spec,
                value: value.to_string(),
            })
        } else {
            Err(Error::FixedFieldLengthError)
        }
    }

    pub fn spec(&self) -> &'static spec::FixedField {
        self.spec
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Translate a FixedField into a string which can be inserted into
    /// a SIP message.
    ///
    /// ```
    /// use sipcodec::FixedField;
    /// use sipcodec::spec;
    /// let ff = FixedField::new(&spec::FF_MAX_PRINT_WIDTH, "999").unwrap();
    /// assert_eq!(ff.to_sip(), "999");
    /// ```
    pub fn to_sip(&self) -> &str {
        &self.value
    }
}

/// SIP Field with code and value.
///
/// To support passing field types that are not known at compile time,
/// store the field code instead of a ref to a well-known spec::Field.
#[derive(PartialEq, Debug)]
pub struct Field {
    /// 2-character code
    code: String,

    /// Field value
    value: String,
}

impl Field {
    pub fn new(code: &str, value: &str) -> Self {
        Field {
            code: code.to_string(),
            value: value.to_string(),
        }
    }

    /// value getter
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
    }

    /// code getter
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Create a SIP string from a field
    ///
    /// String includes the trailing delimiter.  Any occurrence of the
    /// delimiter within the value is dropped.
    ///
    /// ```
    /// use sipcodec::Field;
    /// use sipcodec::spec;
    /// let f = Field::new(spec::F_LOGIN_UID.code, "sip_username");
    /// assert_eq!(f.to_sip('|'), "CNsip_username|");
    /// ```
    pub fn to_sip(&self, delimiter: char) -> String {
        let mut s = self.code.to_string();
        s += &util::sip_string(&self.value, delimiter);
        s.push(delimiter);
        s
    }
}

/// SIP message complete with message code, fixed fields, and fields.
///
/// Variable fields are kept in insertion order; response handlers
/// append them in the order their response contract prescribes and
/// that order is preserved on the wire.
#[derive(PartialEq, Debug)]
pub struct Message {
    /// Link to the specification for this message type
    spec: &'static spec::Message,

    /// List of fixed fields
    fixed_fields: Vec<FixedField>,

    /// List of fields
    fields: Vec<Field>,
}

impl Message {
    pub fn new(
        spec: &'static spec::Message,
        fixed_fields: Vec<FixedField>,
        fields: Vec<Field>,
    ) -> Self {
        Message {
            spec,
            fixed_fields,
            fields,
        }
    }

    /// Creates a new message from a set of fixed field values.
    ///
    /// Returns an error if the fixed field values provided are not
    /// the correct length for the specified message type.
    pub fn from_ff_values(
        msg_spec: &'static spec::Message,
        fixed_fields: &[&str],
    ) -> Result<Message, Error> {
        let mut ff: Vec<FixedField> = Vec::new();

        for (idx, ff_spec) in msg_spec.fixed_fields.iter().enumerate() {
            if let Some(v) = fixed_fields.get(idx) {
                ff.push(FixedField::new(ff_spec, v)?);
            }
        }

        if ff.len() != msg_spec.fixed_fields.len() {
            warn!(
                "SIP message {} given incorrect number of fixed fields",
                msg_spec.code
            );
            return Err(Error::MessageFormatError);
        }

        Ok(Message {
            spec: msg_spec,
            fixed_fields: ff,
            fields: Vec::new(),
        })
    }

    /// Create a new message from a list of fixed field and field
    /// string values.
    pub fn from_values(
        msg_spec: &'static spec::Message,
        fixed_fields: &[&str],
        fields: &[(&str, &str)],
    ) -> Result<Message, Error> {
        let mut msg = Message::from_ff_values(msg_spec, fixed_fields)?;
        for field in fields {
            msg.add_field(field.0, field.1);
        }
        Ok(msg)
    }

    /// Adds a Field to a message.
    ///
    /// The field is always emitted, even when the value is empty --
    /// several responses have required fields whose values may be
    /// blank.
    ///
    /// ```
    /// use sipcodec::{Message, Field};
    /// use sipcodec::spec;
    ///
    /// let mut msg = Message::new(&spec::M_LOGIN, vec![], vec![]);
    ///
    /// msg.add_field("ZZ", "ZZ is a value");
    /// assert_eq!(msg.fields()[0].code(), "ZZ");
    /// ```
    pub fn add_field(&mut self, code: &str, value: &str) {
        self.fields.push(Field::new(code, value));
    }

    /// Adds a field to a SIP message if the provided value is neither
    /// None nor empty.
    pub fn maybe_add_field(&mut self, code: &str, value: Option<&str>) {
        if let Some(v) = value {
            if !v.is_empty() {
                self.fields.push(Field::new(code, v));
            }
        }
    }

    /// Return the first value with the specified field code.
    pub fn get_field_value(&self, code: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.code() == code)
            .map(|f| f.value.as_str())
    }

    pub fn spec(&self) -> &'static spec::Message {
        self.spec
    }

    pub fn fields(&self) -> &Vec<Field> {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut Vec<Field> {
        &mut self.fields
    }

    pub fn fixed_fields(&self) -> &Vec<FixedField> {
        &self.fixed_fields
    }

    /// Create a SIP string of a message.
    ///
    /// ```
    /// use sipcodec::{Message, Field, FixedField};
    /// use sipcodec::spec;
    ///
    /// let msg = Message::new(
    ///     &spec::M_LOGIN,
    ///     vec![
    ///         FixedField::new(&spec::FF_UID_ALGO, "0").unwrap(),
    ///         FixedField::new(&spec::FF_PWD_ALGO, "0").unwrap(),
    ///     ],
    ///     vec![
    ///         Field::new(spec::F_LOGIN_UID.code, "sip_username"),
    ///         Field::new(spec::F_LOGIN_PWD.code, "sip_password"),
    ///     ]
    /// );
    ///
    /// assert_eq!(msg.to_sip('|'), "9300CNsip_username|COsip_password|");
    /// ```
    pub fn to_sip(&self, delimiter: char) -> String {
        let mut s = self.spec.code.to_string();

        for ff in self.fixed_fields.iter() {
            s.push_str(ff.to_sip());
        }

        for f in self.fields.iter() {
            s.push_str(&f.to_sip(delimiter));
        }

        s
    }

    /// Same as to_sip() but replaces the patron password 'AD' value
    /// with redacted text.
    ///
    /// Useful for logging.
    pub fn to_sip_redacted(&self, delimiter: char) -> String {
        let mut s = self.spec.code.to_string();

        for ff in self.fixed_fields.iter() {
            s.push_str(ff.to_sip());
        }

        for f in self.fields.iter() {
            if f.code() == spec::F_PATRON_PWD.code {
                s += f.code();
                s += PASSWORD_REDACTED;
                s.push(delimiter);
            } else {
                s.push_str(&f.to_sip(delimiter));
            }
        }

        s
    }

    /// Turns a SIP string into a Message.
    ///
    /// Assumes the error-detection trailer and the trailing message
    /// terminator character have been removed.
    ///
    /// The message code must carry a schema under the given protocol
    /// version.  Variable fields the schema does not recognize are
    /// logged and skipped; a duplicated field keeps its first value.
    ///
    /// ```
    /// use sipcodec::Message;
    /// use sipcodec::spec::ProtocolVersion;
    /// let sip_text = "9300CNsip_username|COsip_password|";
    /// let msg = Message::from_sip(sip_text, ProtocolVersion::V2, '|').unwrap();
    /// assert_eq!(msg.spec().code, "93");
    /// assert_eq!(msg.fields()[0].code(), "CN");
    /// assert_eq!(msg.fields()[1].value(), "sip_password");
    /// ```
    pub fn from_sip(
        text: &str,
        version: ProtocolVersion,
        delimiter: char,
    ) -> Result<Message, Error> {
        if text.len() < 2 {
            warn!("SIP message is incomplete: {text}");
            return Err(Error::MessageFormatError);
        }

        if !text.is_ascii() {
            warn!("SIP message contains non-ASCII data: {text}");
            return Err(Error::MessageFormatError);
        }

        let code = &text[0..2];

        let msg_schema = match schema::lookup(code, version) {
            Some(s) => s,
            None => {
                if spec::Message::from_code(code).is_some() {
                    warn!("Message '{code}' is not available under protocol {version}");
                    return Err(Error::UnsupportedVersionError);
                }
                error!("Unknown message type: {code}");
                return Err(Error::UnknownMessageError);
            }
        };

        let mut msg = Message {
            spec: msg_schema.message(),
            fixed_fields: vec![],
            fields: vec![],
        };

        // Remove the message code
        let mut msg_text = &text[2..];

        for ff_spec in msg_schema.fixed_fields().iter() {
            if msg_text.len() < ff_spec.length {
                warn!(
                    "Message {code} has invalid fixed field: {} : {}",
                    ff_spec.label, msg_text
                );
                return Err(Error::MessageFormatError);
            }

            // Values are raw substrings; no trimming.
            let value = &msg_text[0..ff_spec.length];
            msg_text = &msg_text[ff_spec.length..];

            // unwrap() is OK because we have confirmed the value has
            // the correct length above.
            msg.fixed_fields
                .push(FixedField::new(ff_spec, value).unwrap());
        }

        // Remainder of the frame is variable fields: 2-character code,
        // value, delimiter.
        let mut rest = msg_text;

        while !rest.is_empty() {
            if rest.len() < 2 {
                warn!("Message {code} has dangling field data: '{rest}'");
                break;
            }

            let field_code = &rest[..2];
            let after = &rest[2..];

            let (value, remainder) = match after.find(delimiter) {
                Some(pos) => (&after[..pos], &after[pos + delimiter.len_utf8()..]),
                None => {
                    warn!("Field '{field_code}' in message {code} has no terminating delimiter");
                    (after, "")
                }
            };

            rest = remainder;

            if !msg_schema.allows(field_code) {
                warn!("Message {code} does not recognize field '{field_code}', skipping");
                continue;
            }

            if msg.get_field_value(field_code).is_some() {
                warn!("Message {code} repeats field '{field_code}', keeping the first value");
                continue;
            }

            msg.fields.push(Field::new(field_code, value));
        }

        Ok(msg)
    }
}

/// Message display support for logging / debugging.
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{} {}", self.spec.code, self.spec.label)?;

        for ff in self.fixed_fields.iter() {
            writeln!(f, "   {:.<35} {}", ff.spec.label, ff.value)?;
        }

        for field in self.fields.iter() {
            if let Some(spec) = spec::Field::from_code(&field.code) {
                writeln!(f, "{} {:.<35} {}", spec.code, spec.label, field.value)?;
            } else {
                writeln!(f, "{} {:.<35} {}", field.code, "custom", field.value)?;
            }
        }

        write!(f, "")
    }
}

//! SIP2 Specification as a collection of static values.
//!
//! Message codes, fixed field templates, and the per-protocol-version
//! sets of variable fields recognized on each request are all defined
//! here.  The tables mirror the 3M SIP 1.00/2.00 documents; do not edit
//! them without the documents in hand.
use std::fmt;

pub const SIP_PROTOCOL_VERSION: &str = "2.00";
pub const LINE_TERMINATOR: &str = "\r";
pub const SIP_DATE_FORMAT: &str = "%Y%m%d    %H%M%S";

/// Default variable-field delimiter.
///
/// Servers may be configured with a different delimiter, but the
/// default is near-universal in deployed terminals.
pub const DEFAULT_FIELD_DELIMITER: char = '|';

/// Protocol version negotiated on a SIP session.
///
/// Sessions start at 1.00.  A Login request implies 2.00, and an SC
/// Status request carries the version the terminal wants to speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolVersion {
    V1,
    V2,
}

impl ProtocolVersion {
    /// Parse the 4-character protocol version fixed field of an SC
    /// Status request ("1.00", "2.00").
    ///
    /// Unrecognized revisions fall back to 1.00.
    ///
    /// ```
    /// use sipcodec::spec::ProtocolVersion;
    /// assert_eq!(ProtocolVersion::from_sc_status("2.00"), ProtocolVersion::V2);
    /// assert_eq!(ProtocolVersion::from_sc_status("1.00"), ProtocolVersion::V1);
    /// ```
    pub fn from_sc_status(value: &str) -> ProtocolVersion {
        if value.starts_with('2') {
            ProtocolVersion::V2
        } else {
            if !value.starts_with('1') {
                log::warn!("Unrecognized protocol revision '{value}', falling back to 1.00");
            }
            ProtocolVersion::V1
        }
    }

    /// The 4-character form used in ACS Status responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtocolVersion::V1 => "1.00",
            ProtocolVersion::V2 => "2.00",
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fixed field definition with label and field length
#[derive(PartialEq, Debug)]
pub struct FixedField {
    /// For documentation and debugging purposes.
    ///
    /// This value does not appear in any messages.
    pub label: &'static str,

    /// Length of the fixed field.
    ///
    /// Fixed field values are always ASCII, this is essentially
    /// the number of characters in the fixed field.
    pub length: usize,
}

impl fmt::Display for FixedField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.length)
    }
}

/// Field definition with label and 2-character code.
#[derive(PartialEq, Debug)]
pub struct Field {
    /// For documentation and debugging purposes.
    ///
    /// This value does not appear in any messages.
    pub label: &'static str,

    /// 2-Character SIP Field Code
    pub code: &'static str,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.code, self.label)
    }
}

impl Field {
    /// Get a Field from its 2-character code.
    ///
    /// ```
    /// use sipcodec::spec;
    /// let f = &spec::F_LOGIN_UID;
    /// let f2 = spec::Field::from_code(f.code).unwrap();
    /// assert_eq!(f2.code, f.code);
    /// ```
    pub fn from_code(code: &str) -> Option<&'static Field> {
        ALL_FIELDS.iter().find(|f| f.code == code).copied()
    }
}

/// SIP message definition with 2-character code, label, fixed field
/// template, and the variable fields recognized per protocol version.
///
/// The fixed field template is shared by both protocol versions; only
/// the variable field sets differ.  `v1_fields`/`v2_fields` are None
/// when the message is not declared for that version of the protocol.
/// A message declared for 1.00 only is served unchanged under 2.00
/// (see the schema registry), while a 2.00-only message is rejected
/// under 1.00.
///
/// Responses composed by the server carry no recognized-field sets;
/// handlers may attach any catalogued field.
#[derive(PartialEq, Debug)]
pub struct Message {
    /// Two-Character SIP Message Code
    pub code: &'static str,

    /// For documentation and debugging purposes.
    ///
    /// This value does not appear in any messages.
    pub label: &'static str,

    /// Fixed fields used by this message, defined in the order they
    /// appear in the compiled message.
    pub fixed_fields: &'static [&'static FixedField],

    /// Variable fields recognized under protocol 1.00.
    pub v1_fields: Option<&'static [&'static Field]>,

    /// Variable fields recognized under protocol 2.00, where they
    /// differ from 1.00.
    pub v2_fields: Option<&'static [&'static Field]>,
}

impl Message {
    /// Maps a message code to a message spec.
    ///
    /// ```
    /// use sipcodec::spec;
    /// let msg = &spec::M_LOGIN;
    /// let msg2 = spec::Message::from_code(msg.code).unwrap();
    /// assert_eq!(msg2.code, msg.code);
    /// ```
    pub fn from_code(code: &str) -> Option<&'static Message> {
        ALL_MESSAGES.iter().find(|m| m.code == code).copied()
    }

    /// Sum of the fixed field widths.
    pub fn fixed_len(&self) -> usize {
        self.fixed_fields.iter().map(|ff| ff.length).sum()
    }
}

// -------------------------------------------------------------------------
// Fixed Fields
// -------------------------------------------------------------------------

type FF = FixedField; // local shorthand

pub const FF_DATE: FF = FF {
    length: 18,
    label: "transaction date",
};
pub const FF_OK: FF = FF {
    length: 1,
    label: "ok",
};
pub const FF_UID_ALGO: FF = FF {
    length: 1,
    label: "uid algorithm",
};
pub const FF_PWD_ALGO: FF = FF {
    length: 1,
    label: "pwd algorithm",
};
pub const FF_FEE_TYPE: FF = FF {
    length: 2,
    label: "fee type",
};
pub const FF_PAYMENT_TYPE: FF = FF {
    length: 2,
    label: "payment type",
};
pub const FF_CURRENCY: FF = FF {
    length: 3,
    label: "currency type",
};
pub const FF_PAYMENT_ACCEPTED: FF = FF {
    length: 1,
    label: "payment accepted",
};
pub const FF_CIRCULATION_STATUS: FF = FF {
    length: 2,
    label: "circulation status",
};
pub const FF_SECURITY_MARKER: FF = FF {
    length: 2,
    label: "security marker",
};
pub const FF_LANGUAGE: FF = FF {
    length: 3,
    label: "language",
};
pub const FF_PATRON_STATUS: FF = FF {
    length: 14,
    label: "patron status",
};
pub const FF_SUMMARY: FF = FF {
    length: 10,
    label: "summary",
};
pub const FF_HOLD_ITEMS_COUNT: FF = FF {
    length: 4,
    label: "hold items count",
};
pub const FF_OD_ITEMS_COUNT: FF = FF {
    length: 4,
    label: "overdue items count",
};
pub const FF_CH_ITEMS_COUNT: FF = FF {
    length: 4,
    label: "charged items count",
};
pub const FF_FINE_ITEMS_COUNT: FF = FF {
    length: 4,
    label: "fine items count",
};
pub const FF_RECALL_ITEMS_COUNT: FF = FF {
    length: 4,
    label: "recall items count",
};
pub const FF_UNAVAIL_HOLDS_COUNT: FF = FF {
    length: 4,
    label: "unavail holds count",
};
pub const FF_SC_RENEWAL_POLICY: FF = FF {
    length: 1,
    label: "sc renewal policy",
};
pub const FF_NO_BLOCK: FF = FF {
    length: 1,
    label: "no block",
};
pub const FF_NB_DUE_DATE: FF = FF {
    length: 18,
    label: "nb due date",
};
pub const FF_STATUS_CODE: FF = FF {
    length: 1,
    label: "status code",
};
pub const FF_MAX_PRINT_WIDTH: FF = FF {
    length: 3,
    label: "max print width",
};
pub const FF_PROTOCOL_VERSION: FF = FF {
    length: 4,
    label: "protocol version",
};
pub const FF_RENEW_OK: FF = FF {
    length: 1,
    label: "renewal ok",
};
pub const FF_MAGNETIC_MEDIA: FF = FF {
    length: 1,
    label: "magnetic media",
};
pub const FF_DESENSITIZE: FF = FF {
    length: 1,
    label: "desensitize",
};
pub const FF_RESENSITIZE: FF = FF {
    length: 1,
    label: "resensitize",
};
pub const FF_RETURN_DATE: FF = FF {
    length: 18,
    label: "return date",
};
pub const FF_ALERT: FF = FF {
    length: 1,
    label: "alert",
};
pub const FF_ONLINE_STATUS: FF = FF {
    length: 1,
    label: "on-line status",
};
pub const FF_CHECKIN_OK: FF = FF {
    length: 1,
    label: "checkin ok",
};
pub const FF_CHECKOUT_OK: FF = FF {
    length: 1,
    label: "checkout ok",
};
pub const FF_ACS_RENEWAL_POLICY: FF = FF {
    length: 1,
    label: "acs renewal policy",
};
pub const FF_STATUS_UPDATE_OK: FF = FF {
    length: 1,
    label: "status update ok",
};
pub const FF_OFFLINE_OK: FF = FF {
    length: 1,
    label: "offline ok",
};
pub const FF_TIMEOUT_PERIOD: FF = FF {
    length: 3,
    label: "timeout period",
};
pub const FF_RETRIES_ALLOWED: FF = FF {
    length: 3,
    label: "retries allowed",
};
pub const FF_DATETIME_SYNC: FF = FF {
    length: 18,
    label: "date/time sync",
};
pub const FF_THIRD_PARTY_ALLOWED: FF = FF {
    length: 1,
    label: "third party allowed",
};
pub const FF_RENEWED_COUNT: FF = FF {
    length: 4,
    label: "renewed count",
};
pub const FF_UNRENEWED_COUNT: FF = FF {
    length: 4,
    label: "unrenewed count",
};
pub const FF_HOLD_MODE: FF = FF {
    length: 1,
    label: "hold mode",
};
pub const FF_HOLD_AVAILABLE: FF = FF {
    length: 1,
    label: "hold available",
};
pub const FF_CARD_RETAINED: FF = FF {
    length: 1,
    label: "card retained",
};
pub const FF_END_PATRON_SESSION: FF = FF {
    length: 1,
    label: "end session",
};

// -------------------------------------------------------------------------
// Fields
// -------------------------------------------------------------------------

type F = Field; // local shorthand

pub const F_LOGIN_UID: F = F {
    code: "CN",
    label: "login user id",
};
pub const F_LOGIN_PWD: F = F {
    code: "CO",
    label: "login password",
};
pub const F_PATRON_ID: F = F {
    code: "AA",
    label: "patron identifier",
};
pub const F_ITEM_IDENT: F = F {
    code: "AB",
    label: "item identifier",
};
pub const F_TERMINAL_PWD: F = F {
    code: "AC",
    label: "terminal password",
};
pub const F_PATRON_PWD: F = F {
    code: "AD",
    label: "patron password",
};
pub const F_PERSONAL_NAME: F = F {
    code: "AE",
    label: "personal name",
};
pub const F_SCREEN_MSG: F = F {
    code: "AF",
    label: "screen message",
};
pub const F_PRINT_LINE: F = F {
    code: "AG",
    label: "print line",
};
pub const F_DUE_DATE: F = F {
    code: "AH",
    label: "due date",
};
pub const F_TITLE_IDENT: F = F {
    code: "AJ",
    label: "title identifier",
};
pub const F_BLOCKED_CARD_MSG: F = F {
    code: "AL",
    label: "blocked card msg",
};
pub const F_LIBRARY_NAME: F = F {
    code: "AM",
    label: "library name",
};
pub const F_TERMINAL_LOCATION: F = F {
    code: "AN",
    label: "terminal location",
};
pub const F_INSTITUTION_ID: F = F {
    code: "AO",
    label: "institution id",
};
pub const F_CURRENT_LOCATION: F = F {
    code: "AP",
    label: "current location",
};
pub const F_PERMANENT_LOCATION: F = F {
    code: "AQ",
    label: "permanent location",
};
pub const F_HOLD_ITEMS: F = F {
    code: "AS",
    label: "hold items",
};
pub const F_OVERDUE_ITEMS: F = F {
    code: "AT",
    label: "overdue items",
};
pub const F_CHARGED_ITEMS: F = F {
    code: "AU",
    label: "charged items",
};
pub const F_FINE_ITEMS: F = F {
    code: "AV",
    label: "fine items",
};
pub const F_SEQUENCE_NUMBER: F = F {
    code: "AY",
    label: "sequence number",
};
pub const F_CHECKSUM: F = F {
    code: "AZ",
    label: "checksum",
};
pub const F_HOME_ADDRESS: F = F {
    code: "BD",
    label: "home address",
};
pub const F_EMAIL_ADDRESS: F = F {
    code: "BE",
    label: "e-mail address",
};
pub const F_HOME_PHONE: F = F {
    code: "BF",
    label: "home phone number",
};
pub const F_OWNER: F = F {
    code: "BG",
    label: "owner",
};
pub const F_CURRENCY: F = F {
    code: "BH",
    label: "currency type",
};
pub const F_CANCEL: F = F {
    code: "BI",
    label: "cancel",
};
pub const F_TRANSACTION_ID: F = F {
    code: "BK",
    label: "transaction id",
};
pub const F_VALID_PATRON: F = F {
    code: "BL",
    label: "valid patron",
};
pub const F_RENEWED_ITEMS: F = F {
    code: "BM",
    label: "renewed items",
};
pub const F_UNRENEWED_ITEMS: F = F {
    code: "BN",
    label: "unrenewed items",
};
pub const F_FEE_ACKNOWLEDGED: F = F {
    code: "BO",
    label: "fee acknowledged",
};
pub const F_START_ITEM: F = F {
    code: "BP",
    label: "start item",
};
pub const F_END_ITEM: F = F {
    code: "BQ",
    label: "end item",
};
pub const F_QUEUE_POSITION: F = F {
    code: "BR",
    label: "queue position",
};
pub const F_PICKUP_LOCATION: F = F {
    code: "BS",
    label: "pickup location",
};
pub const F_FEE_TYPE: F = F {
    code: "BT",
    label: "fee type",
};
pub const F_RECALL_ITEMS: F = F {
    code: "BU",
    label: "recall items",
};
pub const F_FEE_AMOUNT: F = F {
    code: "BV",
    label: "fee amount",
};
pub const F_EXPIRE_DATE: F = F {
    code: "BW",
    label: "expiration date",
};
pub const F_SUPPORTED_MESSAGES: F = F {
    code: "BX",
    label: "supported messages",
};
pub const F_HOLD_TYPE: F = F {
    code: "BY",
    label: "hold type",
};
pub const F_HOLD_ITEMS_LIMIT: F = F {
    code: "BZ",
    label: "hold items limit",
};
pub const F_OVERDUE_ITEMS_LIMIT: F = F {
    code: "CA",
    label: "overdue items limit",
};
pub const F_CHARGED_ITEMS_LIMIT: F = F {
    code: "CB",
    label: "charged items limit",
};
pub const F_FEE_LIMIT: F = F {
    code: "CC",
    label: "fee limit",
};
pub const F_UNAVAIL_HOLD_ITEMS: F = F {
    code: "CD",
    label: "unavailable hold items",
};
pub const F_HOLD_QUEUE_LENGTH: F = F {
    code: "CF",
    label: "hold queue length",
};
pub const F_FEE_IDENTIFIER: F = F {
    code: "CG",
    label: "fee identifier",
};
pub const F_ITEM_PROPERTIES: F = F {
    code: "CH",
    label: "item properties",
};
pub const F_SECURITY_INHIBIT: F = F {
    code: "CI",
    label: "security inhibit",
};
pub const F_RECALL_DATE: F = F {
    code: "CJ",
    label: "recall date",
};
pub const F_MEDIA_TYPE: F = F {
    code: "CK",
    label: "media type",
};
pub const F_SORT_BIN: F = F {
    code: "CL",
    label: "sort bin",
};
pub const F_HOLD_PICKUP_DATE: F = F {
    code: "CM",
    label: "hold pickup date",
};
pub const F_LOCATION_CODE: F = F {
    code: "CP",
    label: "location code",
};
pub const F_VALID_PATRON_PWD: F = F {
    code: "CQ",
    label: "valid patron password",
};
pub const F_COLLECTION_CODE: F = F {
    code: "CR",
    label: "collection code",
};
pub const F_CALL_NUMBER: F = F {
    code: "CS",
    label: "call number",
};
pub const F_DEST_LOCATION: F = F {
    code: "CT",
    label: "destination location",
};
pub const F_ALERT_TYPE: F = F {
    code: "CV",
    label: "alert type",
};
pub const F_HOLD_PATRON_ID: F = F {
    code: "CY",
    label: "hold patron id",
};
pub const F_HOLD_PATRON_NAME: F = F {
    code: "DA",
    label: "hold patron name",
};
pub const F_INET_PROFILE: F = F {
    code: "PI",
    label: "patron internet profile",
};

//  Envisionware Terminal Extensions
pub const F_PATRON_EXPIRE_DATE: F = F {
    code: "PA",
    label: "patron expire date",
};
pub const F_PATRON_DOB: F = F {
    code: "PB",
    label: "patron birth date",
};
pub const F_PATRON_CLASS: F = F {
    code: "PC",
    label: "patron class",
};

/// Every catalogued field, for code lookups.
///
/// The SIP2 field catalogue is closed; field IDs not listed here are
/// logged and skipped by the parser.
pub const ALL_FIELDS: &[&Field] = &[
    &F_LOGIN_UID,
    &F_LOGIN_PWD,
    &F_PATRON_ID,
    &F_ITEM_IDENT,
    &F_TERMINAL_PWD,
    &F_PATRON_PWD,
    &F_PERSONAL_NAME,
    &F_SCREEN_MSG,
    &F_PRINT_LINE,
    &F_DUE_DATE,
    &F_TITLE_IDENT,
    &F_BLOCKED_CARD_MSG,
    &F_LIBRARY_NAME,
    &F_TERMINAL_LOCATION,
    &F_INSTITUTION_ID,
    &F_CURRENT_LOCATION,
    &F_PERMANENT_LOCATION,
    &F_HOLD_ITEMS,
    &F_OVERDUE_ITEMS,
    &F_CHARGED_ITEMS,
    &F_FINE_ITEMS,
    &F_SEQUENCE_NUMBER,
    &F_CHECKSUM,
    &F_HOME_ADDRESS,
    &F_EMAIL_ADDRESS,
    &F_HOME_PHONE,
    &F_OWNER,
    &F_CURRENCY,
    &F_CANCEL,
    &F_TRANSACTION_ID,
    &F_VALID_PATRON,
    &F_RENEWED_ITEMS,
    &F_UNRENEWED_ITEMS,
    &F_FEE_ACKNOWLEDGED,
    &F_START_ITEM,
    &F_END_ITEM,
    &F_QUEUE_POSITION,
    &F_PICKUP_LOCATION,
    &F_FEE_TYPE,
    &F_RECALL_ITEMS,
    &F_FEE_AMOUNT,
    &F_EXPIRE_DATE,
    &F_SUPPORTED_MESSAGES,
    &F_HOLD_TYPE,
    &F_HOLD_ITEMS_LIMIT,
    &F_OVERDUE_ITEMS_LIMIT,
    &F_CHARGED_ITEMS_LIMIT,
    &F_FEE_LIMIT,
    &F_UNAVAIL_HOLD_ITEMS,
    &F_HOLD_QUEUE_LENGTH,
    &F_FEE_IDENTIFIER,
    &F_ITEM_PROPERTIES,
    &F_SECURITY_INHIBIT,
    &F_RECALL_DATE,
    &F_MEDIA_TYPE,
    &F_SORT_BIN,
    &F_HOLD_PICKUP_DATE,
    &F_LOCATION_CODE,
    &F_VALID_PATRON_PWD,
    &F_COLLECTION_CODE,
    &F_CALL_NUMBER,
    &F_DEST_LOCATION,
    &F_ALERT_TYPE,
    &F_HOLD_PATRON_ID,
    &F_HOLD_PATRON_NAME,
    &F_INET_PROFILE,
    &F_PATRON_EXPIRE_DATE,
    &F_PATRON_DOB,
    &F_PATRON_CLASS,
];

// -------------------------------------------------------------------------
// Messages
// -------------------------------------------------------------------------

pub const NO_FIELDS: &[&Field] = &[];

/// Message 01
pub const M_BLOCK_PATRON: Message = Message {
    code: "01",
    label: "Block Patron",
    fixed_fields: &[&FF_CARD_RETAINED, &FF_DATE],
    v1_fields: Some(&[
        &F_INSTITUTION_ID,
        &F_BLOCKED_CARD_MSG,
        &F_PATRON_ID,
        &F_TERMINAL_PWD,
    ]),
    v2_fields: None,
};

/// Message 09
pub const M_CHECKIN: Message = Message {
    code: "09",
    label: "Checkin Request",
    fixed_fields: &[&FF_NO_BLOCK, &FF_DATE, &FF_RETURN_DATE],
    v1_fields: Some(&[
        &F_CURRENT_LOCATION,
        &F_INSTITUTION_ID,
        &F_ITEM_IDENT,
        &F_TERMINAL_PWD,
    ]),
    v2_fields: Some(&[
        &F_CURRENT_LOCATION,
        &F_INSTITUTION_ID,
        &F_ITEM_IDENT,
        &F_TERMINAL_PWD,
        &F_ITEM_PROPERTIES,
        &F_CANCEL,
    ]),
};

/// Message 10
pub const M_CHECKIN_RESP: Message = Message {
    code: "10",
    label: "Checkin Response",
    fixed_fields: &[
        &FF_OK,
        &FF_RESENSITIZE,
        &FF_MAGNETIC_MEDIA,
        &FF_ALERT,
        &FF_DATE,
    ],
    v1_fields: None,
    v2_fields: None,
};

/// Message 11
pub const M_CHECKOUT: Message = Message {
    code: "11",
    label: "Checkout Request",
    fixed_fields: &[
        &FF_SC_RENEWAL_POLICY,
        &FF_NO_BLOCK,
        &FF_DATE,
        &FF_NB_DUE_DATE,
    ],
    v1_fields: Some(&[
        &F_INSTITUTION_ID,
        &F_PATRON_ID,
        &F_ITEM_IDENT,
        &F_TERMINAL_PWD,
    ]),
    v2_fields: Some(&[
        &F_INSTITUTION_ID,
        &F_PATRON_ID,
        &F_ITEM_IDENT,
        &F_TERMINAL_PWD,
        &F_ITEM_PROPERTIES,
        &F_PATRON_PWD,
        &F_FEE_ACKNOWLEDGED,
        &F_CANCEL,
    ]),
};

/// Message 12
pub const M_CHECKOUT_RESP: Message = Message {
    code: "12",
    label: "Checkout Response",
    fixed_fields: &[
        &FF_OK,
        &FF_RENEW_OK,
        &FF_MAGNETIC_MEDIA,
        &FF_DESENSITIZE,
        &FF_DATE,
    ],
    v1_fields: None,
    v2_fields: None,
};

/// Message 15
pub const M_HOLD: Message = Message {
    code: "15",
    label: "Hold Request",
    fixed_fields: &[&FF_HOLD_MODE, &FF_DATE],
    v1_fields: None,
    v2_fields: Some(&[
        &F_EXPIRE_DATE,
        &F_PICKUP_LOCATION,
        &F_HOLD_TYPE,
        &F_INSTITUTION_ID,
        &F_PATRON_ID,
        &F_PATRON_PWD,
        &F_ITEM_IDENT,
        &F_TITLE_IDENT,
        &F_TERMINAL_PWD,
        &F_FEE_ACKNOWLEDGED,
    ]),
};

/// Message 16
pub const M_HOLD_RESP: Message = Message {
    code: "16",
    label: "Hold Response",
    fixed_fields: &[&FF_OK, &FF_HOLD_AVAILABLE, &FF_DATE],
    v1_fields: None,
    v2_fields: None,
};

/// Message 17
pub const M_ITEM_INFO: Message = Message {
    code: "17",
    label: "Item Information Request",
    fixed_fields: &[&FF_DATE],
    v1_fields: None,
    v2_fields: Some(&[&F_INSTITUTION_ID, &F_ITEM_IDENT, &F_TERMINAL_PWD]),
};

/// Message 18
pub const M_ITEM_INFO_RESP: Message = Message {
    code: "18",
    label: "Item Information Response",
    fixed_fields: &[
        &FF_CIRCULATION_STATUS,
        &FF_SECURITY_MARKER,
        &FF_FEE_TYPE,
        &FF_DATE,
    ],
    v1_fields: None,
    v2_fields: None,
};

/// Message 19
pub const M_ITEM_STATUS_UPDATE: Message = Message {
    code: "19",
    label: "Item Status Update",
    fixed_fields: &[&FF_DATE],
    v1_fields: None,
    v2_fields: Some(&[
        &F_INSTITUTION_ID,
        &F_PATRON_ID,
        &F_ITEM_IDENT,
        &F_TERMINAL_PWD,
        &F_ITEM_PROPERTIES,
    ]),
};

/// Message 20
pub const M_ITEM_STATUS_UPDATE_RESP: Message = Message {
    code: "20",
    label: "Item Status Update Response",
    fixed_fields: &[&FF_OK, &FF_DATE],
    v1_fields: None,
    v2_fields: None,
};

/// Message 23
pub const M_PATRON_STATUS: Message = Message {
    code: "23",
    label: "Patron Status Request",
    fixed_fields: &[&FF_LANGUAGE, &FF_DATE],
    v1_fields: Some(&[
        &F_INSTITUTION_ID,
        &F_PATRON_ID,
        &F_TERMINAL_PWD,
        &F_PATRON_PWD,
    ]),
    v2_fields: None,
};

/// Message 24
pub const M_PATRON_STATUS_RESP: Message = Message {
    code: "24",
    label: "Patron Status Response",
    fixed_fields: &[&FF_PATRON_STATUS, &FF_LANGUAGE, &FF_DATE],
    v1_fields: None,
    v2_fields: None,
};

/// Message 25
pub const M_PATRON_ENABLE: Message = Message {
    code: "25",
    label: "Patron Enable",
    fixed_fields: &[&FF_DATE],
    v1_fields: None,
    v2_fields: Some(&[
        &F_INSTITUTION_ID,
        &F_PATRON_ID,
        &F_TERMINAL_PWD,
        &F_PATRON_PWD,
    ]),
};

/// Message 26
pub const M_PATRON_ENABLE_RESP: Message = Message {
    code: "26",
    label: "Patron Enable Response",
    fixed_fields: &[&FF_PATRON_STATUS, &FF_LANGUAGE, &FF_DATE],
    v1_fields: None,
    v2_fields: None,
};

/// Message 29
pub const M_RENEW: Message = Message {
    code: "29",
    label: "Renew Request",
    fixed_fields: &[
        &FF_THIRD_PARTY_ALLOWED,
        &FF_NO_BLOCK,
        &FF_DATE,
        &FF_NB_DUE_DATE,
    ],
    v1_fields: None,
    v2_fields: Some(&[
        &F_INSTITUTION_ID,
        &F_PATRON_ID,
        &F_PATRON_PWD,
        &F_ITEM_IDENT,
        &F_TITLE_IDENT,
        &F_TERMINAL_PWD,
        &F_ITEM_PROPERTIES,
        &F_FEE_ACKNOWLEDGED,
    ]),
};

/// Message 30
pub const M_RENEW_RESP: Message = Message {
    code: "30",
    label: "Renew Response",
    fixed_fields: &[
        &FF_OK,
        &FF_RENEW_OK,
        &FF_MAGNETIC_MEDIA,
        &FF_DESENSITIZE,
        &FF_DATE,
    ],
    v1_fields: None,
    v2_fields: None,
};

/// Message 35
pub const M_END_PATRON_SESSION: Message = Message {
    code: "35",
    label: "End Patron Session",
    fixed_fields: &[&FF_DATE],
    v1_fields: None,
    v2_fields: Some(&[
        &F_INSTITUTION_ID,
        &F_PATRON_ID,
        &F_TERMINAL_PWD,
        &F_PATRON_PWD,
    ]),
};

/// Message 36
pub const M_END_PATRON_SESSION_RESP: Message = Message {
    code: "36",
    label: "End Session Response",
    fixed_fields: &[&FF_END_PATRON_SESSION, &FF_DATE],
    v1_fields: None,
    v2_fields: None,
};

/// Message 37
pub const M_FEE_PAID: Message = Message {
    code: "37",
    label: "Fee Paid",
    fixed_fields: &[&FF_DATE, &FF_FEE_TYPE, &FF_PAYMENT_TYPE, &FF_CURRENCY],
    v1_fields: None,
    v2_fields: Some(&[
        &F_FEE_AMOUNT,
        &F_INSTITUTION_ID,
        &F_PATRON_ID,
        &F_TERMINAL_PWD,
        &F_PATRON_PWD,
        &F_FEE_IDENTIFIER,
        &F_TRANSACTION_ID,
    ]),
};

/// Message 38
pub const M_FEE_PAID_RESP: Message = Message {
    code: "38",
    label: "Fee Paid Response",
    fixed_fields: &[&FF_PAYMENT_ACCEPTED, &FF_DATE],
    v1_fields: None,
    v2_fields: None,
};

/// Message 63
pub const M_PATRON_INFO: Message = Message {
    code: "63",
    label: "Patron Information",
    fixed_fields: &[&FF_LANGUAGE, &FF_DATE, &FF_SUMMARY],
    v1_fields: None,
    v2_fields: Some(&[
        &F_INSTITUTION_ID,
        &F_PATRON_ID,
        &F_TERMINAL_PWD,
        &F_PATRON_PWD,
        &F_START_ITEM,
        &F_END_ITEM,
    ]),
};

/// Message 64
pub const M_PATRON_INFO_RESP: Message = Message {
    code: "64",
    label: "Patron Information Response",
    fixed_fields: &[
        &FF_PATRON_STATUS,
        &FF_LANGUAGE,
        &FF_DATE,
        &FF_HOLD_ITEMS_COUNT,
        &FF_OD_ITEMS_COUNT,
        &FF_CH_ITEMS_COUNT,
        &FF_FINE_ITEMS_COUNT,
        &FF_RECALL_ITEMS_COUNT,
        &FF_UNAVAIL_HOLDS_COUNT,
    ],
    v1_fields: None,
    v2_fields: None,
};

/// Message 65
pub const M_RENEW_ALL: Message = Message {
    code: "65",
    label: "Renew All Request",
    fixed_fields: &[&FF_DATE],
    v1_fields: None,
    v2_fields: Some(&[
        &F_INSTITUTION_ID,
        &F_PATRON_ID,
        &F_PATRON_PWD,
        &F_TERMINAL_PWD,
        &F_FEE_ACKNOWLEDGED,
    ]),
};

/// Message 66
pub const M_RENEW_ALL_RESP: Message = Message {
    code: "66",
    label: "Renew All Response",
    fixed_fields: &[&FF_OK, &FF_RENEWED_COUNT, &FF_UNRENEWED_COUNT, &FF_DATE],
    v1_fields: None,
    v2_fields: None,
};

/// Message 93
pub const M_LOGIN: Message = Message {
    code: "93",
    label: "Login Request",
    fixed_fields: &[&FF_UID_ALGO, &FF_PWD_ALGO],
    v1_fields: None,
    v2_fields: Some(&[&F_LOGIN_UID, &F_LOGIN_PWD, &F_LOCATION_CODE]),
};

/// Message 94
pub const M_LOGIN_RESP: Message = Message {
    code: "94",
    label: "Login Response",
    fixed_fields: &[&FF_OK],
    v1_fields: None,
    v2_fields: None,
};

/// Message 96
pub const M_REQUEST_SC_RESEND: Message = Message {
    code: "96",
    label: "Request SC Resend",
    fixed_fields: &[],
    v1_fields: None,
    v2_fields: None,
};

/// Message 97
pub const M_REQUEST_ACS_RESEND: Message = Message {
    code: "97",
    label: "Request ACS Resend",
    fixed_fields: &[],
    v1_fields: Some(NO_FIELDS),
    v2_fields: None,
};

/// Message 98
pub const M_ACS_STATUS: Message = Message {
    code: "98",
    label: "ACS Status",
    fixed_fields: &[
        &FF_ONLINE_STATUS,
        &FF_CHECKIN_OK,
        &FF_CHECKOUT_OK,
        &FF_ACS_RENEWAL_POLICY,
        &FF_STATUS_UPDATE_OK,
        &FF_OFFLINE_OK,
        &FF_TIMEOUT_PERIOD,
        &FF_RETRIES_ALLOWED,
        &FF_DATETIME_SYNC,
        &FF_PROTOCOL_VERSION,
    ],
    v1_fields: None,
    v2_fields: None,
};

/// Message 99
pub const M_SC_STATUS: Message = Message {
    code: "99",
    label: "SC Status",
    fixed_fields: &[&FF_STATUS_CODE, &FF_MAX_PRINT_WIDTH, &FF_PROTOCOL_VERSION],
    v1_fields: Some(NO_FIELDS),
    v2_fields: None,
};

/// Every message, requests and responses, for code lookups.
pub const ALL_MESSAGES: &[&Message] = &[
    &M_BLOCK_PATRON,
    &M_CHECKIN,
    &M_CHECKIN_RESP,
    &M_CHECKOUT,
    &M_CHECKOUT_RESP,
    &M_HOLD,
    &M_HOLD_RESP,
    &M_ITEM_INFO,
    &M_ITEM_INFO_RESP,
    &M_ITEM_STATUS_UPDATE,
    &M_ITEM_STATUS_UPDATE_RESP,
    &M_PATRON_STATUS,
    &M_PATRON_STATUS_RESP,
    &M_PATRON_ENABLE,
    &M_PATRON_ENABLE_RESP,
    &M_RENEW,
    &M_RENEW_RESP,
    &M_END_PATRON_SESSION,
    &M_END_PATRON_SESSION_RESP,
    &M_FEE_PAID,
    &M_FEE_PAID_RESP,
    &M_PATRON_INFO,
    &M_PATRON_INFO_RESP,
    &M_RENEW_ALL,
    &M_RENEW_ALL_RESP,
    &M_LOGIN,
    &M_LOGIN_RESP,
    &M_REQUEST_SC_RESEND,
    &M_REQUEST_ACS_RESEND,
    &M_ACS_STATUS,
    &M_SC_STATUS,
];

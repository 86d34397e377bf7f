//! SIP utility functions
use super::error;
use super::spec;
use chrono::{DateTime, FixedOffset, Local, TimeZone};
use log::error;

/// Clean up a string for inclusion in a SIP message
///
/// The delimiter may never occur inside a field value.
///
/// ```
/// use sipcodec::util;
/// let result = util::sip_string("howdy|par|dner", '|');
/// assert_eq!(result, "howdypardner");
/// ```
///
pub fn sip_string(text: &str, delimiter: char) -> String {
    text.replace(delimiter, "")
}

/// Current date + time in SIP format
pub fn sip_date_now() -> String {
    Local::now().format(spec::SIP_DATE_FORMAT).to_string()
}

/// Translate an iso8601-ish to SIP format
///
/// ```
/// use sipcodec::util;
///
/// let date_op = util::sip_date("1996-12-19T16:39:57-08:00");
/// assert_eq!(date_op.is_ok(), true);
///
/// let result = date_op.unwrap();
/// assert_eq!(result, "19961219    163957");
///
/// let date_op2 = util::sip_date("YARP!");
/// assert_eq!(date_op2.is_err(), true);
/// ```
pub fn sip_date(iso_date: &str) -> Result<String, error::Error> {
    match DateTime::parse_from_rfc3339(iso_date) {
        Ok(dt) => Ok(dt.format(spec::SIP_DATE_FORMAT).to_string()),
        Err(s) => {
            error!("Error parsing sip date: {} : {}", iso_date, s);
            Err(error::Error::DateFormatError)
        }
    }
}

/// Same as sip_date(), but starting from a DateTime object.
pub fn sip_date_from_dt(dt: &DateTime<FixedOffset>) -> String {
    dt.format(spec::SIP_DATE_FORMAT).to_string()
}

/// Same as sip_date(), but starting from a unix epoch, rendered in
/// local time.
pub fn sip_date_from_epoch(epoch: i64) -> Result<String, error::Error> {
    match Local.timestamp_opt(epoch, 0).single() {
        Some(dt) => Ok(dt.format(spec::SIP_DATE_FORMAT).to_string()),
        None => {
            error!("Epoch out of range for sip date: {epoch}");
            Err(error::Error::DateFormatError)
        }
    }
}

/// Returns "Y" on true, " " on false.
pub fn space_bool(value: bool) -> &'static str {
    match value {
        true => "Y",
        false => " ",
    }
}

/// Inverted sense of space_bool(), used for the privilege bits of the
/// patron status string: a "Y" there means the action is denied.
pub fn denied_bool(allowed: bool) -> &'static str {
    space_bool(!allowed)
}

pub fn sip_bool(value: bool) -> &'static str {
    match value {
        true => "Y",
        false => "N",
    }
}

pub fn num_bool(value: bool) -> &'static str {
    match value {
        true => "1",
        false => "0",
    }
}

/// Stringify a count left padded with zeros, as used in the summary
/// count slots of a Patron Information response.
///
/// The wire slot is four characters; larger counts are capped.
///
/// ```
/// use sipcodec::util;
/// assert_eq!(util::sip_count4(7), "0007");
/// assert_eq!(util::sip_count4(123456), "9999");
/// ```
pub fn sip_count4(value: usize) -> String {
    format!("{:0>4}", value.min(9999))
}

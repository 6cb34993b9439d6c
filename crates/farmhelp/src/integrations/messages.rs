use chrono::{DateTime, TimeZone};

use crate::records::{ApplicationForm, ContactForm};

const TIME_FORMAT: &str = "%d %b %Y, %I:%M %p";

/// Spoken by the overflow alert call.
pub const TANK_OVERFLOW_TWIML: &str =
    "<Response><Say>Hey! this is from farmhelp your watertank is over flowing.</Say></Response>";

pub fn application_alert<Tz>(form: &ApplicationForm, at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "🟢 APPLICATION RECEIVED\n\
         *Name*    : {}\n\
         *Mobile*  : {}\n\
         *Address* : {}\n\
         *Time*    : {}",
        form.name,
        form.mobile_no,
        form.home_address,
        at.format(TIME_FORMAT)
    )
}

pub fn contact_alert<Tz>(form: &ContactForm, at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "🔴 CONTACT ALERT\n\
         *Name*   : {}\n\
         *Mobile* : {}\n\
         *Issue*  : {}\n\
         *Time*   : {}",
        form.name,
        form.mobile_no,
        form.problem,
        at.format(TIME_FORMAT)
    )
}

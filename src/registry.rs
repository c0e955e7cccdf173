//! Dispatch from a sentence code to its decode rule.
//!
//! Standard sentences are looked up by their three-letter type, so every
//! talker (`GPGGA`, `GNGGA`, `GLGGA`, ...) shares one rule and only the
//! attached [`TalkerId`] differs. Proprietary `P...` sentences are looked up
//! by their full code. Codes without a rule decode to
//! [`MessageData::Unknown`].

use crate::err::{DecodeError, ParseError};
use crate::framer::{self, RawSentence};
use crate::sentences::fields::Fields;
use crate::sentences::{
    Bod, Dtm, Gbs, Gga, Gll, Gns, Gsa, Gst, Gsv, Heading, LaserRange, Pgrme, Pgrmm, Pgrmz, Rmb,
    Rmc, Rte, TreeMeasurement, Vlw, Vtg, Zda,
};
use crate::talker::TalkerId;

const TALKER_LENGTH: usize = 2;

/// The typed content of a decoded sentence.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageData {
    Gga(Gga),
    Gns(Gns),
    Rmc(Rmc),
    Gll(Gll),
    Gsa(Gsa),
    Gsv(Gsv),
    Gst(Gst),
    Gbs(Gbs),
    Dtm(Dtm),
    Vtg(Vtg),
    Zda(Zda),
    Heading(Heading),
    Rmb(Rmb),
    Rte(Rte),
    Bod(Bod),
    Vlw(Vlw),
    Pgrme(Pgrme),
    Pgrmz(Pgrmz),
    Pgrmm(Pgrmm),
    LaserRange(LaserRange),
    TreeMeasurement(TreeMeasurement),
    /// No rule is registered for the code; the fields are kept verbatim.
    Unknown(Vec<String>),
}

/// A sentence decoded into its typed variant, tagged with its code and talker.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedMessage {
    code: String,
    talker: TalkerId,
    data: MessageData,
}

impl DecodedMessage {
    pub fn new<C: Into<String>>(code: C, data: MessageData) -> Self {
        let code = code.into();
        DecodedMessage {
            talker: TalkerId::from_code(&code),
            code,
            data,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn talker(&self) -> TalkerId {
        self.talker
    }

    pub fn data(&self) -> &MessageData {
        &self.data
    }

    pub fn into_data(self) -> MessageData {
        self.data
    }

    /// The code without its talker prefix (`GGA` for `GNGGA`); proprietary
    /// codes are returned whole.
    pub fn sentence_type(&self) -> &str {
        sentence_type(&self.code)
    }
}

type Rule = fn(Fields) -> Result<MessageData, DecodeError>;

static STANDARD_RULES: &[(&str, Rule)] = &[
    ("GGA", |f| Gga::decode(f).map(MessageData::Gga)),
    ("GNS", |f| Gns::decode(f).map(MessageData::Gns)),
    ("RMC", |f| Rmc::decode(f).map(MessageData::Rmc)),
    ("GLL", |f| Gll::decode(f).map(MessageData::Gll)),
    ("GSA", |f| Gsa::decode(f).map(MessageData::Gsa)),
    ("GSV", |f| Gsv::decode(f).map(MessageData::Gsv)),
    ("GST", |f| Gst::decode(f).map(MessageData::Gst)),
    ("GBS", |f| Gbs::decode(f).map(MessageData::Gbs)),
    ("DTM", |f| Dtm::decode(f).map(MessageData::Dtm)),
    ("VTG", |f| Vtg::decode(f).map(MessageData::Vtg)),
    ("ZDA", |f| Zda::decode(f).map(MessageData::Zda)),
    ("HDT", |f| Heading::decode_true(f).map(MessageData::Heading)),
    ("HDM", |f| Heading::decode_magnetic(f).map(MessageData::Heading)),
    ("RMB", |f| Rmb::decode(f).map(MessageData::Rmb)),
    ("RTE", |f| Rte::decode(f).map(MessageData::Rte)),
    ("BOD", |f| Bod::decode(f).map(MessageData::Bod)),
    ("VLW", |f| Vlw::decode(f).map(MessageData::Vlw)),
];

static PROPRIETARY_RULES: &[(&str, Rule)] = &[
    ("PGRME", |f| Pgrme::decode(f).map(MessageData::Pgrme)),
    ("PGRMZ", |f| Pgrmz::decode(f).map(MessageData::Pgrmz)),
    ("PGRMM", |f| Pgrmm::decode(f).map(MessageData::Pgrmm)),
    ("PTNLA", |f| LaserRange::decode(f).map(MessageData::LaserRange)),
    ("PLTIT", |f| LaserRange::decode(f).map(MessageData::LaserRange)),
    ("PTNLB", |f| TreeMeasurement::decode(f).map(MessageData::TreeMeasurement)),
];

fn sentence_type(code: &str) -> &str {
    if code.starts_with('P') {
        return code;
    }
    code.get(TALKER_LENGTH..).unwrap_or(code)
}

fn lookup(code: &str) -> Option<Rule> {
    let (table, key) = if code.starts_with('P') {
        (PROPRIETARY_RULES, code)
    } else {
        (STANDARD_RULES, code.get(TALKER_LENGTH..)?)
    };
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, rule)| *rule)
}

/// Whether `code` has a decode rule.
pub fn is_registered(code: &str) -> bool {
    lookup(code).is_some()
}

/// Decode a framed sentence. Unregistered codes never fail.
pub fn decode(raw: &RawSentence) -> Result<DecodedMessage, DecodeError> {
    let data = match lookup(&raw.code) {
        Some(rule) => rule(Fields::new(&raw.code, &raw.fields))?,
        None => MessageData::Unknown(raw.fields.clone()),
    };
    Ok(DecodedMessage::new(raw.code.as_str(), data))
}

/// Frame and decode a single line.
pub fn parse(line: &str) -> Result<DecodedMessage, ParseError> {
    let raw = framer::frame(line)?;
    Ok(decode(&raw)?)
}

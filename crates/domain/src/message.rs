use crate::name::DnsName;
use crate::record::{RecordClass, RecordType, ResourceRecord};
use std::fmt;

/// DNS operation code (header bits 11–14).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    Query,
    IQuery,
    Status,
    Notify,
    Update,
    Reserved(u8),
}

impl OpCode {
    pub fn to_u4(self) -> u8 {
        match self {
            OpCode::Query => 0,
            OpCode::IQuery => 1,
            OpCode::Status => 2,
            OpCode::Notify => 4,
            OpCode::Update => 5,
            OpCode::Reserved(code) => code & 0x0f,
        }
    }

    pub fn from_u4(code: u8) -> Self {
        match code & 0x0f {
            0 => OpCode::Query,
            1 => OpCode::IQuery,
            2 => OpCode::Status,
            4 => OpCode::Notify,
            5 => OpCode::Update,
            other => OpCode::Reserved(other),
        }
    }
}

/// DNS response code (header bits 0–3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    NoError,
    FormErr,
    ServFail,
    NxDomain,
    NotImp,
    Refused,
    Other(u8),
}

impl ResponseCode {
    pub fn to_u4(self) -> u8 {
        match self {
            ResponseCode::NoError => 0,
            ResponseCode::FormErr => 1,
            ResponseCode::ServFail => 2,
            ResponseCode::NxDomain => 3,
            ResponseCode::NotImp => 4,
            ResponseCode::Refused => 5,
            ResponseCode::Other(code) => code & 0x0f,
        }
    }

    pub fn from_u4(code: u8) -> Self {
        match code & 0x0f {
            0 => ResponseCode::NoError,
            1 => ResponseCode::FormErr,
            2 => ResponseCode::ServFail,
            3 => ResponseCode::NxDomain,
            4 => ResponseCode::NotImp,
            5 => ResponseCode::Refused,
            other => ResponseCode::Other(other),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::FormErr => "FORMERR",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::NxDomain => "NXDOMAIN",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::Other(_) => "UNKNOWN",
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Decoded header flag bits. The three reserved Z bits are dropped on
/// decode and always emitted as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags {
    pub response: bool,
    pub opcode: OpCode,
    pub authoritative: bool,
    pub truncated: bool,
    pub recursion_desired: bool,
    pub recursion_available: bool,
    pub rcode: ResponseCode,
}

impl Flags {
    /// Flags of a standard recursive query.
    pub fn query() -> Self {
        Self {
            response: false,
            opcode: OpCode::Query,
            authoritative: false,
            truncated: false,
            recursion_desired: true,
            recursion_available: false,
            rcode: ResponseCode::NoError,
        }
    }

    pub fn to_u16(self) -> u16 {
        let mut bits = 0u16;
        if self.response {
            bits |= 1 << 15;
        }
        bits |= (self.opcode.to_u4() as u16) << 11;
        if self.authoritative {
            bits |= 1 << 10;
        }
        if self.truncated {
            bits |= 1 << 9;
        }
        if self.recursion_desired {
            bits |= 1 << 8;
        }
        if self.recursion_available {
            bits |= 1 << 7;
        }
        bits |= self.rcode.to_u4() as u16;
        bits
    }

    pub fn from_u16(bits: u16) -> Self {
        Self {
            response: bits & (1 << 15) != 0,
            opcode: OpCode::from_u4((bits >> 11) as u8),
            authoritative: bits & (1 << 10) != 0,
            truncated: bits & (1 << 9) != 0,
            recursion_desired: bits & (1 << 8) != 0,
            recursion_available: bits & (1 << 7) != 0,
            rcode: ResponseCode::from_u4(bits as u8),
        }
    }
}

/// A single question: name, type and class. Name comparison is
/// case-insensitive through `DnsName`'s equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub name: DnsName,
    pub rtype: RecordType,
    pub class: RecordClass,
}

impl Question {
    pub fn new(name: DnsName, rtype: RecordType, class: RecordClass) -> Self {
        Self { name, rtype, class }
    }
}

/// An in-memory DNS message. Section counts are implicit in the vector
/// lengths; the codec writes and checks them on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: u16,
    pub flags: Flags,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
}

impl Message {
    /// A standard recursive query carrying a single question.
    pub fn query(id: u16, question: Question) -> Self {
        Self {
            id,
            flags: Flags::query(),
            questions: vec![question],
            answers: Vec::new(),
            authorities: Vec::new(),
            additionals: Vec::new(),
        }
    }

    /// A successful response to `query` carrying the given answers.
    /// Mirrors the query's transaction id, opcode and RD flag, and
    /// advertises recursion availability.
    pub fn answer(query: &Message, answers: Vec<ResourceRecord>) -> Self {
        Self {
            id: query.id,
            flags: Flags {
                response: true,
                opcode: query.flags.opcode,
                authoritative: false,
                truncated: false,
                recursion_desired: query.flags.recursion_desired,
                recursion_available: true,
                rcode: ResponseCode::NoError,
            },
            questions: query.questions.clone(),
            answers,
            authorities: Vec::new(),
            additionals: Vec::new(),
        }
    }

    /// An empty response to `query` with the given response code.
    pub fn error_response(query: &Message, rcode: ResponseCode) -> Self {
        let mut response = Self::answer(query, Vec::new());
        response.flags.rcode = rcode;
        response
    }

    /// Response to `query` relaying the answer and authority sections
    /// of an upstream response. The additional section is not relayed;
    /// EDNS negotiation with the client is out of scope.
    pub fn forwarded(query: &Message, upstream: &Message) -> Self {
        let mut response = Self::answer(query, upstream.answers.clone());
        response.flags.rcode = upstream.flags.rcode;
        response.authorities = upstream.authorities.clone();
        response
    }

    /// The first (and for this resolver, only) question.
    pub fn question(&self) -> Option<&Question> {
        self.questions.first()
    }
}

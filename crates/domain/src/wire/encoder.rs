use crate::message::Message;
use crate::name::DnsName;
use crate::record::{RData, ResourceRecord};

/// Encodes a message to wire format. Names are emitted uncompressed,
/// so the output is a deterministic function of the message alone.
pub fn encode(message: &Message) -> Vec<u8> {
    let mut writer = Writer {
        buf: Vec::with_capacity(512),
    };

    writer.put_u16(message.id);
    writer.put_u16(message.flags.to_u16());
    writer.put_u16(message.questions.len() as u16);
    writer.put_u16(message.answers.len() as u16);
    writer.put_u16(message.authorities.len() as u16);
    writer.put_u16(message.additionals.len() as u16);

    for question in &message.questions {
        writer.put_name(&question.name);
        writer.put_u16(question.rtype.to_u16());
        writer.put_u16(question.class.to_u16());
    }
    for record in &message.answers {
        writer.put_record(record);
    }
    for record in &message.authorities {
        writer.put_record(record);
    }
    for record in &message.additionals {
        writer.put_record(record);
    }

    writer.buf
}

struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    fn put_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    fn put_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    fn put_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    fn put_name(&mut self, name: &DnsName) {
        for label in name.labels() {
            self.put_u8(label.len() as u8);
            self.buf.extend_from_slice(label);
        }
        self.put_u8(0);
    }

    fn put_record(&mut self, record: &ResourceRecord) {
        self.put_name(&record.name);
        self.put_u16(record.rtype.to_u16());
        self.put_u16(record.class.to_u16());
        self.put_u32(record.ttl);

        // Length placeholder, backpatched once the rdata is written.
        let len_pos = self.buf.len();
        self.put_u16(0);
        let rdata_start = self.buf.len();
        self.put_rdata(&record.data);
        let rdlen = (self.buf.len() - rdata_start) as u16;
        self.buf[len_pos..len_pos + 2].copy_from_slice(&rdlen.to_be_bytes());
    }

    fn put_rdata(&mut self, data: &RData) {
        match data {
            RData::A(addr) => self.buf.extend_from_slice(&addr.octets()),
            RData::Aaaa(addr) => self.buf.extend_from_slice(&addr.octets()),
            RData::Cname(name) | RData::Ns(name) | RData::Ptr(name) => self.put_name(name),
            RData::Mx {
                preference,
                exchange,
            } => {
                self.put_u16(*preference);
                self.put_name(exchange);
            }
            RData::Txt(segments) => {
                for segment in segments {
                    self.put_u8(segment.len().min(255) as u8);
                    self.buf.extend_from_slice(&segment[..segment.len().min(255)]);
                }
            }
            RData::Soa {
                mname,
                rname,
                serial,
                refresh,
                retry,
                expire,
                minimum,
            } => {
                self.put_name(mname);
                self.put_name(rname);
                self.put_u32(*serial);
                self.put_u32(*refresh);
                self.put_u32(*retry);
                self.put_u32(*expire);
                self.put_u32(*minimum);
            }
            RData::Opaque { data, .. } => self.buf.extend_from_slice(data),
        }
    }
}

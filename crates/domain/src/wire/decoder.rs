use super::{HEADER_LEN, MAX_POINTER_HOPS};
use crate::errors::WireError;
use crate::message::{Flags, Message, Question};
use crate::name::{DnsName, MAX_NAME_LEN};
use crate::record::{RData, RecordClass, RecordType, ResourceRecord};
use std::net::{Ipv4Addr, Ipv6Addr};

/// Decodes a wire-format message, rejecting anything that does not
/// parse exactly: truncated sections, count mismatches, cyclic or
/// overlong compression chains, and trailing bytes.
pub fn decode(buf: &[u8]) -> Result<Message, WireError> {
    if buf.len() < HEADER_LEN {
        return Err(WireError::MessageTooShort(buf.len()));
    }

    let mut reader = Reader { buf, pos: 0 };
    let id = reader.read_u16("header")?;
    let flags = Flags::from_u16(reader.read_u16("header")?);
    let qdcount = reader.read_u16("header")?;
    let ancount = reader.read_u16("header")?;
    let nscount = reader.read_u16("header")?;
    let arcount = reader.read_u16("header")?;

    let mut questions = Vec::with_capacity(qdcount.min(8) as usize);
    for decoded in 0..qdcount {
        match reader.read_question() {
            Ok(question) => questions.push(question),
            Err(WireError::UnexpectedEof(_)) => {
                return Err(WireError::CountMismatch {
                    section: "question",
                    declared: qdcount,
                    decoded,
                })
            }
            Err(e) => return Err(e),
        }
    }

    let answers = reader.read_section("answer", ancount)?;
    let authorities = reader.read_section("authority", nscount)?;
    let additionals = reader.read_section("additional", arcount)?;

    if reader.pos != buf.len() {
        return Err(WireError::TrailingBytes(buf.len() - reader.pos));
    }

    Ok(Message {
        id,
        flags,
        questions,
        answers,
        authorities,
        additionals,
    })
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn read_u8(&mut self, context: &'static str) -> Result<u8, WireError> {
        let byte = *self
            .buf
            .get(self.pos)
            .ok_or(WireError::UnexpectedEof(context))?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_u16(&mut self, context: &'static str) -> Result<u16, WireError> {
        let hi = self.read_u8(context)?;
        let lo = self.read_u8(context)?;
        Ok(u16::from_be_bytes([hi, lo]))
    }

    fn read_u32(&mut self, context: &'static str) -> Result<u32, WireError> {
        let hi = self.read_u16(context)?;
        let lo = self.read_u16(context)?;
        Ok(((hi as u32) << 16) | lo as u32)
    }

    fn read_bytes(&mut self, len: usize, context: &'static str) -> Result<&'a [u8], WireError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.buf.len())
            .ok_or(WireError::UnexpectedEof(context))?;
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    /// Reads a possibly compressed name starting at the current
    /// position. Pointers must point strictly backwards, the chase is
    /// capped at `MAX_POINTER_HOPS`, and the decompressed name is
    /// capped at `MAX_NAME_LEN` octets.
    fn read_name(&mut self) -> Result<DnsName, WireError> {
        let mut labels: Vec<Box<[u8]>> = Vec::new();
        let mut cursor = self.pos;
        let mut resume: Option<usize> = None;
        let mut hops = 0usize;
        let mut name_len = 1usize; // terminating root octet

        loop {
            let len_byte = *self
                .buf
                .get(cursor)
                .ok_or(WireError::UnexpectedEof("name"))?;

            match len_byte & 0xc0 {
                0x00 => {
                    if len_byte == 0 {
                        cursor += 1;
                        if resume.is_none() {
                            resume = Some(cursor);
                        }
                        break;
                    }
                    let len = len_byte as usize;
                    name_len += len + 1;
                    if name_len > MAX_NAME_LEN {
                        return Err(WireError::NameTooLong(name_len));
                    }
                    let end = cursor + 1 + len;
                    if end > self.buf.len() {
                        return Err(WireError::UnexpectedEof("label"));
                    }
                    labels.push(self.buf[cursor + 1..end].to_vec().into_boxed_slice());
                    cursor = end;
                }
                0xc0 => {
                    let second = *self
                        .buf
                        .get(cursor + 1)
                        .ok_or(WireError::UnexpectedEof("compression pointer"))?;
                    let target = (((len_byte & 0x3f) as usize) << 8) | second as usize;

                    hops += 1;
                    if hops > MAX_POINTER_HOPS {
                        return Err(WireError::TooManyPointerHops(MAX_POINTER_HOPS));
                    }
                    // Forward or self pointers are how loops are built.
                    if target >= cursor {
                        return Err(WireError::PointerLoop);
                    }
                    if resume.is_none() {
                        resume = Some(cursor + 2);
                    }
                    cursor = target;
                }
                other => return Err(WireError::ReservedLabelType(other | (len_byte & 0x3f))),
            }
        }

        // `resume` is always set before the loop exits.
        self.pos = resume.unwrap_or(cursor);
        Ok(DnsName::from_wire_labels(labels))
    }

    fn read_question(&mut self) -> Result<Question, WireError> {
        let name = self.read_name()?;
        let rtype = RecordType::from_u16(self.read_u16("question")?);
        let class = RecordClass::from_u16(self.read_u16("question")?);
        Ok(Question::new(name, rtype, class))
    }

    fn read_section(
        &mut self,
        section: &'static str,
        declared: u16,
    ) -> Result<Vec<ResourceRecord>, WireError> {
        let mut records = Vec::with_capacity(declared.min(16) as usize);
        for decoded in 0..declared {
            match self.read_record() {
                Ok(record) => records.push(record),
                Err(WireError::UnexpectedEof(_)) => {
                    return Err(WireError::CountMismatch {
                        section,
                        declared,
                        decoded,
                    })
                }
                Err(e) => return Err(e),
            }
        }
        Ok(records)
    }

    fn read_record(&mut self) -> Result<ResourceRecord, WireError> {
        let name = self.read_name()?;
        let rtype = RecordType::from_u16(self.read_u16("record header")?);
        let class = RecordClass::from_u16(self.read_u16("record header")?);
        let ttl = self.read_u32("record header")?;
        let rdlen = self.read_u16("record header")? as usize;

        let rdata_start = self.pos;
        if rdata_start + rdlen > self.buf.len() {
            return Err(WireError::UnexpectedEof("record data"));
        }

        let data = self.read_rdata(rtype, rdlen)?;

        let consumed = self.pos - rdata_start;
        if consumed != rdlen {
            return Err(WireError::RdataLengthMismatch {
                declared: rdlen,
                consumed,
            });
        }

        Ok(ResourceRecord {
            name,
            rtype,
            class,
            ttl,
            data,
        })
    }

    /// Parses rdata for the typed variants; names inside rdata may use
    /// compression against the whole message. The caller verifies the
    /// declared rdata length was consumed exactly.
    fn read_rdata(&mut self, rtype: RecordType, rdlen: usize) -> Result<RData, WireError> {
        match rtype {
            RecordType::A => {
                let octets = self.read_bytes(4, "A rdata")?;
                Ok(RData::A(Ipv4Addr::new(
                    octets[0], octets[1], octets[2], octets[3],
                )))
            }
            RecordType::Aaaa => {
                let octets = self.read_bytes(16, "AAAA rdata")?;
                let mut bytes = [0u8; 16];
                bytes.copy_from_slice(octets);
                Ok(RData::Aaaa(Ipv6Addr::from(bytes)))
            }
            RecordType::Cname => Ok(RData::Cname(self.read_name()?)),
            RecordType::Ns => Ok(RData::Ns(self.read_name()?)),
            RecordType::Ptr => Ok(RData::Ptr(self.read_name()?)),
            RecordType::Mx => Ok(RData::Mx {
                preference: self.read_u16("MX rdata")?,
                exchange: self.read_name()?,
            }),
            RecordType::Txt => {
                let end = self.pos + rdlen;
                let mut segments = Vec::new();
                while self.pos < end {
                    let len = self.read_u8("TXT rdata")? as usize;
                    if self.pos + len > end {
                        return Err(WireError::UnexpectedEof("TXT rdata"));
                    }
                    segments.push(self.read_bytes(len, "TXT rdata")?.to_vec());
                }
                Ok(RData::Txt(segments))
            }
            RecordType::Soa => Ok(RData::Soa {
                mname: self.read_name()?,
                rname: self.read_name()?,
                serial: self.read_u32("SOA rdata")?,
                refresh: self.read_u32("SOA rdata")?,
                retry: self.read_u32("SOA rdata")?,
                expire: self.read_u32("SOA rdata")?,
                minimum: self.read_u32("SOA rdata")?,
            }),
            RecordType::Other(_) => Ok(RData::Opaque {
                rtype,
                data: self.read_bytes(rdlen, "rdata")?.to_vec(),
            }),
        }
    }
}

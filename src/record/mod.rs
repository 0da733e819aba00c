//! Generic DNS resource record model and typed record parsing.
//!
//! [`RR`] is the provider-agnostic wire-independent representation of a single
//! record: a zone-relative name, a TTL, an uppercase type tag and an opaque
//! data string in zone-file presentation syntax. [`Record`] is the closed set
//! of typed views over an `RR`; [`RR::parse`] dispatches on the type tag and
//! [`ToRr::to_rr`] flattens a typed record back. Both directions are lossless
//! for the supported types.

mod svcparams;

pub use svcparams::{SvcParam, SvcParams, SvcParamsError, MAX_SVC_PARAMS_LEN};

use std::net::IpAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error produced when a recognized record type carries malformed data.
///
/// Unknown record types never produce this error; they degrade to the generic
/// [`Record::Rr`] fallback instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The data string has the wrong number of whitespace-delimited fields.
    #[error("{record_type} record data must have {expected} fields, found {found}")]
    FieldCount {
        /// Record type being parsed.
        record_type: &'static str,
        /// Number of fields the type requires.
        expected: usize,
        /// Number of fields actually present.
        found: usize,
    },

    /// A field does not parse as the expected shape (number, IP address of
    /// the right family, etc.).
    #[error("{record_type} record: invalid {field} {value:?}")]
    InvalidField {
        /// Record type being parsed.
        record_type: &'static str,
        /// Field that failed to parse.
        field: &'static str,
        /// The offending text.
        value: String,
    },

    /// An SRV record name that is not of the form `_service._proto.name`.
    #[error("SRV record name must look like _service._proto.name, got {name:?}")]
    SrvName {
        /// The offending record name.
        name: String,
    },

    /// Malformed SvcParams string in an HTTPS/SVCB record.
    #[error(transparent)]
    SvcParams(#[from] SvcParamsError),
}

/// A generic DNS resource record.
///
/// `name` is zone-relative (`"www"`, `"@"` for the apex) and never empty or
/// fully qualified. `ttl` has seconds resolution; zero means "do not cache".
/// `data` excludes nothing: it is the full presentation-format value for the
/// record type, so an MX `data` includes the preference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RR {
    /// Zone-relative record name.
    pub name: String,
    /// Time to live; serialized as integer seconds.
    #[serde(with = "crate::utils::ttl")]
    pub ttl: Duration,
    /// Uppercase record type tag (`"A"`, `"CNAME"`, ...).
    #[serde(rename = "type")]
    pub record_type: String,
    /// Record value in zone-file presentation syntax.
    pub data: String,
}

/// Capability of flattening to a generic [`RR`].
///
/// This is the single seam the rest of the crate depends on: anything that
/// can reduce itself to an `RR` can be stored, diffed and shipped to a
/// provider. New record kinds only need this one method.
pub trait ToRr {
    /// Flattens to the generic representation. Sub-second TTL fractions are
    /// truncated.
    fn to_rr(&self) -> RR;
}

impl ToRr for RR {
    fn to_rr(&self) -> RR {
        RR {
            ttl: Duration::from_secs(self.ttl.as_secs()),
            ..self.clone()
        }
    }
}

// ============ Typed records ============

/// A or AAAA record; the type tag is inferred from the address family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Zone-relative record name.
    pub name: String,
    /// Time to live.
    #[serde(with = "crate::utils::ttl")]
    pub ttl: Duration,
    /// The address; an IPv4 address flattens to `A`, an IPv6 one to `AAAA`.
    pub ip: IpAddr,
}

/// CAA record (Certification Authority Authorization).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caa {
    /// Zone-relative record name.
    pub name: String,
    /// Time to live.
    #[serde(with = "crate::utils::ttl")]
    pub ttl: Duration,
    /// Issuer critical flag (0 or 128).
    pub flags: u8,
    /// Property tag (`"issue"`, `"issuewild"`, or `"iodef"`).
    pub tag: String,
    /// CA domain or reporting URI.
    pub value: String,
}

/// CNAME record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cname {
    /// Zone-relative record name.
    pub name: String,
    /// Time to live.
    #[serde(with = "crate::utils::ttl")]
    pub ttl: Duration,
    /// Target hostname, copied verbatim.
    pub target: String,
}

/// MX record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mx {
    /// Zone-relative record name.
    pub name: String,
    /// Time to live.
    #[serde(with = "crate::utils::ttl")]
    pub ttl: Duration,
    /// Preference (lower wins).
    pub preference: u16,
    /// Mail server hostname.
    pub target: String,
}

/// NS record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ns {
    /// Zone-relative record name.
    pub name: String,
    /// Time to live.
    #[serde(with = "crate::utils::ttl")]
    pub ttl: Duration,
    /// Name server hostname.
    pub target: String,
}

/// Which service-binding record type a [`ServiceBinding`] flattens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Scheme {
    /// HTTPS record.
    Https,
    /// SVCB record.
    Svcb,
}

impl Scheme {
    /// The uppercase record type tag for this scheme.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Https => "HTTPS",
            Self::Svcb => "SVCB",
        }
    }
}

/// HTTPS or SVCB record (RFC 9460 service binding).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceBinding {
    /// Zone-relative record name.
    pub name: String,
    /// Time to live.
    #[serde(with = "crate::utils::ttl")]
    pub ttl: Duration,
    /// Whether this is an HTTPS or an SVCB record.
    pub scheme: Scheme,
    /// Service priority; 0 marks AliasMode.
    pub priority: u16,
    /// Target name (`"."` for the owner itself).
    pub target: String,
    /// Service parameters.
    pub params: SvcParams,
}

/// SRV record.
///
/// The service and transport labels are carried separately; flattening
/// reassembles the owner name as `_service._transport.name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Srv {
    /// Service label, without the leading underscore (e.g. `"sip"`).
    pub service: String,
    /// Transport label, without the leading underscore (e.g. `"tcp"`).
    pub transport: String,
    /// Zone-relative name after the two prefix labels.
    pub name: String,
    /// Time to live.
    #[serde(with = "crate::utils::ttl")]
    pub ttl: Duration,
    /// Priority (lower wins).
    pub priority: u16,
    /// Weight for load balancing among same-priority targets.
    pub weight: u16,
    /// TCP/UDP port number.
    pub port: u16,
    /// Target hostname providing the service.
    pub target: String,
}

/// TXT record. The text is carried verbatim; no unescaping happens here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Txt {
    /// Zone-relative record name.
    pub name: String,
    /// Time to live.
    #[serde(with = "crate::utils::ttl")]
    pub ttl: Duration,
    /// Text content.
    pub text: String,
}

impl ToRr for Address {
    fn to_rr(&self) -> RR {
        RR {
            name: self.name.clone(),
            ttl: Duration::from_secs(self.ttl.as_secs()),
            record_type: if self.ip.is_ipv4() { "A" } else { "AAAA" }.to_string(),
            data: self.ip.to_string(),
        }
    }
}

impl ToRr for Caa {
    fn to_rr(&self) -> RR {
        RR {
            name: self.name.clone(),
            ttl: Duration::from_secs(self.ttl.as_secs()),
            record_type: "CAA".to_string(),
            data: format!("{} {} \"{}\"", self.flags, self.tag, self.value),
        }
    }
}

impl ToRr for Cname {
    fn to_rr(&self) -> RR {
        RR {
            name: self.name.clone(),
            ttl: Duration::from_secs(self.ttl.as_secs()),
            record_type: "CNAME".to_string(),
            data: self.target.clone(),
        }
    }
}

impl ToRr for Mx {
    fn to_rr(&self) -> RR {
        RR {
            name: self.name.clone(),
            ttl: Duration::from_secs(self.ttl.as_secs()),
            record_type: "MX".to_string(),
            data: format!("{} {}", self.preference, self.target),
        }
    }
}

impl ToRr for Ns {
    fn to_rr(&self) -> RR {
        RR {
            name: self.name.clone(),
            ttl: Duration::from_secs(self.ttl.as_secs()),
            record_type: "NS".to_string(),
            data: self.target.clone(),
        }
    }
}

impl ToRr for ServiceBinding {
    fn to_rr(&self) -> RR {
        let data = if self.params.is_empty() {
            format!("{} {}", self.priority, self.target)
        } else {
            format!("{} {} {}", self.priority, self.target, self.params)
        };
        RR {
            name: self.name.clone(),
            ttl: Duration::from_secs(self.ttl.as_secs()),
            record_type: self.scheme.as_str().to_string(),
            data,
        }
    }
}

impl ToRr for Srv {
    fn to_rr(&self) -> RR {
        RR {
            name: format!("_{}._{}.{}", self.service, self.transport, self.name),
            ttl: Duration::from_secs(self.ttl.as_secs()),
            record_type: "SRV".to_string(),
            data: format!(
                "{} {} {} {}",
                self.priority, self.weight, self.port, self.target
            ),
        }
    }
}

impl ToRr for Txt {
    fn to_rr(&self) -> RR {
        RR {
            name: self.name.clone(),
            ttl: Duration::from_secs(self.ttl.as_secs()),
            record_type: "TXT".to_string(),
            data: self.text.clone(),
        }
    }
}

// ============ Tagged union over all supported types ============

/// A DNS record, either as one of the typed variants or as the generic
/// [`RR`] fallback for types this crate does not model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// A or AAAA record.
    Address(Address),
    /// CAA record.
    Caa(Caa),
    /// CNAME record.
    Cname(Cname),
    /// MX record.
    Mx(Mx),
    /// NS record.
    Ns(Ns),
    /// HTTPS or SVCB record.
    ServiceBinding(ServiceBinding),
    /// SRV record.
    Srv(Srv),
    /// TXT record.
    Txt(Txt),
    /// Any other record type, kept in generic form.
    Rr(RR),
}

impl ToRr for Record {
    fn to_rr(&self) -> RR {
        match self {
            Self::Address(r) => r.to_rr(),
            Self::Caa(r) => r.to_rr(),
            Self::Cname(r) => r.to_rr(),
            Self::Mx(r) => r.to_rr(),
            Self::Ns(r) => r.to_rr(),
            Self::ServiceBinding(r) => r.to_rr(),
            Self::Srv(r) => r.to_rr(),
            Self::Txt(r) => r.to_rr(),
            Self::Rr(r) => r.to_rr(),
        }
    }
}

macro_rules! impl_from_record {
    ($($variant:ident => $ty:ty),+ $(,)?) => {
        $(impl From<$ty> for Record {
            fn from(value: $ty) -> Self {
                Self::$variant(value)
            }
        })+
    };
}

impl_from_record! {
    Address => Address,
    Caa => Caa,
    Cname => Cname,
    Mx => Mx,
    Ns => Ns,
    ServiceBinding => ServiceBinding,
    Srv => Srv,
    Txt => Txt,
    Rr => RR,
}

impl RR {
    /// Parses the opaque data string into a typed [`Record`], dispatching on
    /// the type tag (case-insensitive).
    ///
    /// Unknown record types are not an error; they come back unchanged as
    /// [`Record::Rr`]. A recognized type with malformed data fails with a
    /// [`ParseError`] naming the expected shape.
    ///
    /// ```
    /// use zonekit::record::{Record, RR};
    /// use std::time::Duration;
    ///
    /// let rr = RR {
    ///     name: "www".to_string(),
    ///     ttl: Duration::from_secs(300),
    ///     record_type: "A".to_string(),
    ///     data: "192.0.2.1".to_string(),
    /// };
    /// assert!(matches!(rr.parse()?, Record::Address(_)));
    /// # Ok::<(), zonekit::record::ParseError>(())
    /// ```
    pub fn parse(&self) -> Result<Record, ParseError> {
        match self.record_type.to_ascii_uppercase().as_str() {
            "A" => self.parse_address("A").map(Record::Address),
            "AAAA" => self.parse_address("AAAA").map(Record::Address),
            "CAA" => self.parse_caa().map(Record::Caa),
            "CNAME" => Ok(Record::Cname(Cname {
                name: self.name.clone(),
                ttl: self.ttl,
                target: self.data.clone(),
            })),
            "MX" => self.parse_mx().map(Record::Mx),
            "NS" => Ok(Record::Ns(Ns {
                name: self.name.clone(),
                ttl: self.ttl,
                target: self.data.clone(),
            })),
            "HTTPS" => self
                .parse_service_binding(Scheme::Https)
                .map(Record::ServiceBinding),
            "SVCB" => self
                .parse_service_binding(Scheme::Svcb)
                .map(Record::ServiceBinding),
            "SRV" => self.parse_srv().map(Record::Srv),
            "TXT" => Ok(Record::Txt(Txt {
                name: self.name.clone(),
                ttl: self.ttl,
                text: self.data.clone(),
            })),
            _ => Ok(Record::Rr(self.clone())),
        }
    }

    fn parse_address(&self, record_type: &'static str) -> Result<Address, ParseError> {
        let ip: IpAddr = self.data.parse().map_err(|_| ParseError::InvalidField {
            record_type,
            field: "address",
            value: self.data.clone(),
        })?;
        let family_matches = (record_type == "A") == ip.is_ipv4();
        if !family_matches {
            return Err(ParseError::InvalidField {
                record_type,
                field: "address",
                value: self.data.clone(),
            });
        }
        Ok(Address {
            name: self.name.clone(),
            ttl: self.ttl,
            ip,
        })
    }

    fn parse_caa(&self) -> Result<Caa, ParseError> {
        let fields: Vec<&str> = self.data.splitn(3, ' ').collect();
        if fields.len() != 3 {
            return Err(ParseError::FieldCount {
                record_type: "CAA",
                expected: 3,
                found: fields.len(),
            });
        }
        let flags = fields[0].parse().map_err(|_| ParseError::InvalidField {
            record_type: "CAA",
            field: "flags",
            value: fields[0].to_string(),
        })?;
        let value = fields[2]
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(fields[2]);
        Ok(Caa {
            name: self.name.clone(),
            ttl: self.ttl,
            flags,
            tag: fields[1].to_string(),
            value: value.to_string(),
        })
    }

    fn parse_mx(&self) -> Result<Mx, ParseError> {
        let fields: Vec<&str> = self.data.split_whitespace().collect();
        if fields.len() != 2 {
            return Err(ParseError::FieldCount {
                record_type: "MX",
                expected: 2,
                found: fields.len(),
            });
        }
        let preference = fields[0].parse().map_err(|_| ParseError::InvalidField {
            record_type: "MX",
            field: "preference",
            value: fields[0].to_string(),
        })?;
        Ok(Mx {
            name: self.name.clone(),
            ttl: self.ttl,
            preference,
            target: fields[1].to_string(),
        })
    }

    fn parse_service_binding(&self, scheme: Scheme) -> Result<ServiceBinding, ParseError> {
        let record_type = scheme.as_str();
        // Only the first two fields are whitespace-delimited; everything
        // after the target belongs to the SvcParams string, which may
        // contain spaces inside quotes.
        let fields: Vec<&str> = self.data.splitn(3, ' ').collect();
        if fields.len() < 2 {
            return Err(ParseError::FieldCount {
                record_type,
                expected: 2,
                found: fields.len(),
            });
        }
        let priority = fields[0].parse().map_err(|_| ParseError::InvalidField {
            record_type,
            field: "priority",
            value: fields[0].to_string(),
        })?;
        let params = SvcParams::parse(fields.get(2).unwrap_or(&""))?;
        Ok(ServiceBinding {
            name: self.name.clone(),
            ttl: self.ttl,
            scheme,
            priority,
            target: fields[1].to_string(),
            params,
        })
    }

    fn parse_srv(&self) -> Result<Srv, ParseError> {
        let labels: Vec<&str> = self.name.splitn(3, '.').collect();
        let (service, transport, rest) = match labels.as_slice() {
            [service, transport, rest] => {
                match (service.strip_prefix('_'), transport.strip_prefix('_')) {
                    (Some(s), Some(t)) => (s, t, *rest),
                    _ => {
                        return Err(ParseError::SrvName {
                            name: self.name.clone(),
                        })
                    }
                }
            }
            _ => {
                return Err(ParseError::SrvName {
                    name: self.name.clone(),
                })
            }
        };

        let fields: Vec<&str> = self.data.split_whitespace().collect();
        if fields.len() != 4 {
            return Err(ParseError::FieldCount {
                record_type: "SRV",
                expected: 4,
                found: fields.len(),
            });
        }
        let number = |field: &'static str, text: &str| -> Result<u16, ParseError> {
            text.parse().map_err(|_| ParseError::InvalidField {
                record_type: "SRV",
                field,
                value: text.to_string(),
            })
        };
        Ok(Srv {
            service: service.to_string(),
            transport: transport.to_string(),
            name: rest.to_string(),
            ttl: self.ttl,
            priority: number("priority", fields[0])?,
            weight: number("weight", fields[1])?,
            port: number("port", fields[2])?,
            target: fields[3].to_string(),
        })
    }
}

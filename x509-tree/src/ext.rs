use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use yasna::models::ObjectIdentifier;
use yasna::{ASN1Result, BERReader, DERWriter, Tag};

use crate::oid;

// Defined in the GeneralName list in
// https://tools.ietf.org/html/rfc5280#page-38
const TAG_RFC822_NAME: u64 = 1;
const TAG_DNS_NAME: u64 = 2;
const TAG_URI: u64 = 6;
const TAG_IP_ADDRESS: u64 = 7;

/// A certificate extension
///
/// See [RFC 5280 Section 4.2](https://www.rfc-editor.org/rfc/rfc5280#section-4.2).
/// Whether an unknown critical extension is acceptable is left to the caller.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Extension {
	extn_id: ObjectIdentifier,
	critical: bool,
	extn_value: ExtensionValue,
}

impl Extension {
	/// Creates an extension from its parts
	pub fn new(extn_id: ObjectIdentifier, critical: bool, extn_value: ExtensionValue) -> Self {
		Self {
			extn_id,
			critical,
			extn_value,
		}
	}
	/// The extension identifier
	pub fn extn_id(&self) -> &ObjectIdentifier {
		&self.extn_id
	}
	/// Whether the extension is marked critical
	pub fn critical(&self) -> bool {
		self.critical
	}
	/// The decoded extension value
	pub fn extn_value(&self) -> &ExtensionValue {
		&self.extn_value
	}

	pub(crate) fn read(reader: BERReader) -> ASN1Result<Self> {
		reader.read_sequence(|reader| {
			let extn_id = reader.next().read_oid()?;
			let critical = reader.read_optional(|reader| reader.read_bool())?;
			let value = reader.next().read_bytes()?;
			let extn_value = ExtensionValue::from_der(&extn_id, &value);
			Ok(Self {
				extn_id,
				critical: critical.unwrap_or(false),
				extn_value,
			})
		})
	}

	pub(crate) fn write(&self, writer: DERWriter) {
		// Extension specification:
		//    Extension  ::=  SEQUENCE  {
		//         extnID      OBJECT IDENTIFIER,
		//         critical    BOOLEAN DEFAULT FALSE,
		//         extnValue   OCTET STRING
		//                     -- contains the DER encoding of an ASN.1 value
		//                     -- corresponding to the extension type identified
		//                     -- by extnID
		//         }
		writer.write_sequence(|writer| {
			writer.next().write_oid(&self.extn_id);
			// DER forbids encoding a DEFAULT value
			if self.critical {
				writer.next().write_bool(true);
			}
			writer.next().write_bytes(&self.extn_value.to_der());
		})
	}
}

/// The value of an [`Extension`]
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
#[non_exhaustive]
pub enum ExtensionValue {
	/// The basic constraints extension
	BasicConstraints(BasicConstraints),
	/// The subject alternative name extension
	SubjectAlternativeName(Vec<GeneralName>),
	/// Any other extension, or one whose encoding was not canonical DER
	Raw(Vec<u8>),
}

impl ExtensionValue {
	/// Decodes the contents of the `extnValue` octet string of the extension `extn_id`
	///
	/// A typed value is only produced when encoding it again yields `der`
	/// exactly, so no value decoded here changes bytes on the way back out.
	pub fn from_der(extn_id: &ObjectIdentifier, der: &[u8]) -> Self {
		let typed = if oid::is(extn_id, oid::BASIC_CONSTRAINTS) {
			yasna::parse_der(der, BasicConstraints::read)
				.ok()
				.map(ExtensionValue::BasicConstraints)
		} else if oid::is(extn_id, oid::SUBJECT_ALT_NAME) {
			yasna::parse_der(der, read_general_names)
				.ok()
				.map(ExtensionValue::SubjectAlternativeName)
		} else {
			None
		};
		match typed {
			Some(value) if value.to_der() == der => value,
			Some(_) => {
				log::debug!("extension {extn_id} is not canonical DER, keeping it raw");
				ExtensionValue::Raw(der.to_vec())
			},
			None => ExtensionValue::Raw(der.to_vec()),
		}
	}
	/// Encodes the value, as placed in the `extnValue` octet string
	pub fn to_der(&self) -> Vec<u8> {
		match self {
			ExtensionValue::BasicConstraints(bc) => yasna::construct_der(|writer| bc.write(writer)),
			ExtensionValue::SubjectAlternativeName(names) => {
				yasna::construct_der(|writer| {
					writer.write_sequence(|writer| {
						for name in names {
							name.write(writer.next());
						}
					})
				})
			},
			ExtensionValue::Raw(der) => der.clone(),
		}
	}
	/// The basic constraints, if this is a decoded basic constraints value
	pub fn as_basic_constraints(&self) -> Option<&BasicConstraints> {
		match self {
			ExtensionValue::BasicConstraints(bc) => Some(bc),
			_ => None,
		}
	}
	/// The names, if this is a decoded subject alternative name value
	pub fn as_subject_alternative_names(&self) -> Option<&[GeneralName]> {
		match self {
			ExtensionValue::SubjectAlternativeName(names) => Some(names),
			_ => None,
		}
	}
}

/// The basic constraints extension value
///
/// See [RFC 5280 Section 4.2.1.9](https://www.rfc-editor.org/rfc/rfc5280#section-4.2.1.9).
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
pub struct BasicConstraints {
	ca: bool,
	path_len_constraint: Option<u64>,
}

impl BasicConstraints {
	/// Creates the extension value
	///
	/// The path length is only meaningful for CA certificates.
	pub fn new(ca: bool, path_len_constraint: Option<u64>) -> Self {
		Self {
			ca,
			path_len_constraint,
		}
	}
	/// Whether the subject is a CA
	pub fn ca(&self) -> bool {
		self.ca
	}
	/// Maximum number of intermediate certificates that may follow this one
	pub fn path_len_constraint(&self) -> Option<u64> {
		self.path_len_constraint
	}

	fn read(reader: BERReader) -> ASN1Result<Self> {
		reader.read_sequence(|reader| {
			let ca = reader.read_optional(|reader| reader.read_bool())?;
			let path_len_constraint = reader.read_optional(|reader| reader.read_u64())?;
			Ok(Self {
				ca: ca.unwrap_or(false),
				path_len_constraint,
			})
		})
	}

	fn write(&self, writer: DERWriter) {
		writer.write_sequence(|writer| {
			if self.ca {
				writer.next().write_bool(true);
			}
			if let Some(path_len_constraint) = self.path_len_constraint {
				writer.next().write_u64(path_len_constraint);
			}
		})
	}
}

/// An entry of the subject alternative name extension
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
#[non_exhaustive]
pub enum GeneralName {
	/// Also known as E-Mail address
	Rfc822Name(String),
	/// A DNS name
	DnsName(String),
	/// A uniform resource identifier
	Uri(String),
	/// An IPv4 or IPv6 address
	IpAddress(IpAddr),
	/// Any other kind of name, as the DER of the complete element
	Other(Vec<u8>),
}

impl GeneralName {
	fn read(mut reader: BERReader) -> ASN1Result<Self> {
		let tag = reader.lookahead_tag()?;
		let string_tag = [TAG_RFC822_NAME, TAG_DNS_NAME, TAG_URI, TAG_IP_ADDRESS]
			.into_iter()
			.find(|n| tag == Tag::context(*n));
		let Some(n) = string_tag else {
			return Ok(GeneralName::Other(reader.read_der()?));
		};
		let octets = reader.read_tagged_implicit(Tag::context(n), |reader| reader.read_bytes())?;
		let name = match n {
			TAG_IP_ADDRESS => ip_addr_from_octets(&octets).map(GeneralName::IpAddress),
			_ => String::from_utf8(octets.clone()).ok().map(|s| match n {
				TAG_RFC822_NAME => GeneralName::Rfc822Name(s),
				TAG_DNS_NAME => GeneralName::DnsName(s),
				_ => GeneralName::Uri(s),
			}),
		};
		Ok(name.unwrap_or_else(|| {
			GeneralName::Other(yasna::construct_der(|writer| {
				writer.write_tagged_implicit(Tag::context(n), |writer| writer.write_bytes(&octets))
			}))
		}))
	}

	fn write(&self, writer: DERWriter) {
		let (n, content) = match self {
			GeneralName::Rfc822Name(name) => (TAG_RFC822_NAME, name.as_bytes().to_vec()),
			GeneralName::DnsName(name) => (TAG_DNS_NAME, name.as_bytes().to_vec()),
			GeneralName::Uri(name) => (TAG_URI, name.as_bytes().to_vec()),
			GeneralName::IpAddress(IpAddr::V4(addr)) => (TAG_IP_ADDRESS, addr.octets().to_vec()),
			GeneralName::IpAddress(IpAddr::V6(addr)) => (TAG_IP_ADDRESS, addr.octets().to_vec()),
			GeneralName::Other(der) => {
				writer.write_der(der);
				return;
			},
		};
		writer.write_tagged_implicit(Tag::context(n), |writer| writer.write_bytes(&content));
	}
}

fn read_general_names(reader: BERReader) -> ASN1Result<Vec<GeneralName>> {
	let mut names = Vec::new();
	reader.read_sequence_of(|reader| {
		names.push(GeneralName::read(reader)?);
		Ok(())
	})?;
	Ok(names)
}

fn ip_addr_from_octets(octets: &[u8]) -> Option<IpAddr> {
	if let Ok(ipv6_octets) = <&[u8; 16]>::try_from(octets) {
		Some(Ipv6Addr::from(*ipv6_octets).into())
	} else if let Ok(ipv4_octets) = <&[u8; 4]>::try_from(octets) {
		Some(Ipv4Addr::from(*ipv4_octets).into())
	} else {
		None
	}
}

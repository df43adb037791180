use std::fmt;

use yasna::models::ObjectIdentifier;
use yasna::tags::{
	TAG_BMPSTRING, TAG_IA5STRING, TAG_PRINTABLESTRING, TAG_TELETEXSTRING, TAG_UNIVERSALSTRING,
	TAG_UTF8STRING,
};
use yasna::{ASN1Result, BERReader, DERWriter};

use crate::oid;

/// The value of a distinguished name attribute
///
/// Recognized directory string types are decoded, anything else is kept
/// as its complete DER encoding.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
#[non_exhaustive]
pub enum AttributeValue {
	/// A string encoded using UTF-8
	Utf8String(String),
	/// An ASCII string containing only A-Z, a-z, 0-9, '()+,-./:=? and `<SPACE>`
	PrintableString(String),
	/// An ASCII string.
	Ia5String(String),
	/// A string encoded using UCS-2
	BmpString(Vec<u8>),
	/// A string of characters from the T.61 character set
	TeletexString(Vec<u8>),
	/// A string encoded using UTF-32
	UniversalString(Vec<u8>),
	/// Any other value, as DER
	Der(Vec<u8>),
}

impl<T> From<T> for AttributeValue
where
	T: Into<String>,
{
	fn from(t: T) -> Self {
		AttributeValue::Utf8String(t.into())
	}
}

impl AttributeValue {
	/// Returns the value as text, if it was stored as one of the ASCII or UTF-8 string types
	pub fn as_str(&self) -> Option<&str> {
		match self {
			AttributeValue::Utf8String(s)
			| AttributeValue::PrintableString(s)
			| AttributeValue::Ia5String(s) => Some(s),
			_ => None,
		}
	}

	pub(crate) fn read(reader: BERReader) -> ASN1Result<Self> {
		let der = reader.read_tagged_der()?;
		let tag = der.tag();
		let text = || String::from_utf8(der.value().to_vec()).ok();
		let value = if tag == TAG_UTF8STRING {
			text().map(AttributeValue::Utf8String)
		} else if tag == TAG_PRINTABLESTRING {
			text().map(AttributeValue::PrintableString)
		} else if tag == TAG_IA5STRING {
			text().map(AttributeValue::Ia5String)
		} else if tag == TAG_BMPSTRING {
			Some(AttributeValue::BmpString(der.value().to_vec()))
		} else if tag == TAG_TELETEXSTRING {
			Some(AttributeValue::TeletexString(der.value().to_vec()))
		} else if tag == TAG_UNIVERSALSTRING {
			Some(AttributeValue::UniversalString(der.value().to_vec()))
		} else {
			None
		};
		Ok(value.unwrap_or_else(|| {
			AttributeValue::Der(yasna::construct_der(|writer| writer.write_tagged_der(&der)))
		}))
	}

	pub(crate) fn write(&self, writer: DERWriter) {
		// The string types are written as raw content under their own tag, so a
		// decoded value is reproduced byte for byte.
		let (tag, content) = match self {
			AttributeValue::Utf8String(s) => (TAG_UTF8STRING, s.as_bytes()),
			AttributeValue::PrintableString(s) => (TAG_PRINTABLESTRING, s.as_bytes()),
			AttributeValue::Ia5String(s) => (TAG_IA5STRING, s.as_bytes()),
			AttributeValue::BmpString(s) => (TAG_BMPSTRING, s.as_slice()),
			AttributeValue::TeletexString(s) => (TAG_TELETEXSTRING, s.as_slice()),
			AttributeValue::UniversalString(s) => (TAG_UNIVERSALSTRING, s.as_slice()),
			AttributeValue::Der(der) => {
				writer.write_der(der);
				return;
			},
		};
		writer.write_tagged_implicit(tag, |writer| writer.write_bytes(content));
	}
}

impl fmt::Display for AttributeValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.as_str() {
			Some(s) => f.write_str(s),
			None => {
				let bytes = match self {
					AttributeValue::BmpString(b)
					| AttributeValue::TeletexString(b)
					| AttributeValue::UniversalString(b)
					| AttributeValue::Der(b) => b.as_slice(),
					_ => &[],
				};
				write!(f, "#")?;
				for b in bytes {
					write!(f, "{b:02x}")?;
				}
				Ok(())
			},
		}
	}
}

/// A single (attribute type, attribute value) pair of a distinguished name
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct AttributeTypeAndValue {
	attribute_type: ObjectIdentifier,
	value: AttributeValue,
}

impl AttributeTypeAndValue {
	/// Creates a new attribute from its type and value
	pub fn new(attribute_type: ObjectIdentifier, value: impl Into<AttributeValue>) -> Self {
		Self {
			attribute_type,
			value: value.into(),
		}
	}
	/// The attribute type
	pub fn attribute_type(&self) -> &ObjectIdentifier {
		&self.attribute_type
	}
	/// The attribute value
	pub fn value(&self) -> &AttributeValue {
		&self.value
	}

	pub(crate) fn read(reader: BERReader) -> ASN1Result<Self> {
		reader.read_sequence(|reader| {
			let attribute_type = reader.next().read_oid()?;
			let value = AttributeValue::read(reader.next())?;
			Ok(Self {
				attribute_type,
				value,
			})
		})
	}

	pub(crate) fn write(&self, writer: DERWriter) {
		writer.write_sequence(|writer| {
			writer.next().write_oid(&self.attribute_type);
			self.value.write(writer.next());
		})
	}
}

/// A relative distinguished name: the set of attributes at one level of a [`Name`]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Default)]
pub struct RelativeDistinguishedName {
	attributes: Vec<AttributeTypeAndValue>,
}

impl RelativeDistinguishedName {
	/// Creates a relative distinguished name from its attributes
	///
	/// The attributes are kept in DER set order, the order they are encoded
	/// and signed in, regardless of the order given here.
	pub fn new(mut attributes: Vec<AttributeTypeAndValue>) -> Self {
		attributes.sort_by_cached_key(|attr| yasna::construct_der(|writer| attr.write(writer)));
		Self { attributes }
	}
	/// Iterate over the attributes
	pub fn iter(&self) -> std::slice::Iter<'_, AttributeTypeAndValue> {
		self.attributes.iter()
	}

	pub(crate) fn read(reader: BERReader) -> ASN1Result<Self> {
		let mut attributes = Vec::new();
		reader.read_set_of(|reader| {
			attributes.push(AttributeTypeAndValue::read(reader)?);
			Ok(())
		})?;
		Ok(Self { attributes })
	}

	pub(crate) fn write(&self, writer: DERWriter) {
		writer.write_set_of(|writer| {
			for attribute in &self.attributes {
				attribute.write(writer.next());
			}
		})
	}
}

/**
Distinguished name used for the issuer and subject fields of a certificate

A name is an ordered sequence of relative distinguished names.

See also the RFC 5280 sections on the [issuer](https://tools.ietf.org/html/rfc5280#section-4.1.2.4)
and [subject](https://tools.ietf.org/html/rfc5280#section-4.1.2.6) fields.
*/
#[derive(Debug, PartialEq, Eq, Hash, Clone, Default)]
pub struct Name {
	rdns: Vec<RelativeDistinguishedName>,
}

impl Name {
	/// Creates a name from its relative distinguished names
	pub fn new(rdns: Vec<RelativeDistinguishedName>) -> Self {
		Self { rdns }
	}
	/// Builds a name with one single-valued RDN per `(type, value)` pair
	///
	/// ```
	/// # use x509_tree::{oid, AttributeValue, Name, ObjectIdentifier};
	/// let name = Name::from_attributes([
	/// 	(ObjectIdentifier::from_slice(oid::COUNTRY_NAME), AttributeValue::PrintableString("BR".into())),
	/// 	(ObjectIdentifier::from_slice(oid::COMMON_NAME), "crabs.crabs".into()),
	/// ]);
	/// assert_eq!(name.find(oid::COMMON_NAME), Some(&AttributeValue::from("crabs.crabs")));
	/// ```
	pub fn from_attributes(
		attributes: impl IntoIterator<Item = (ObjectIdentifier, AttributeValue)>,
	) -> Self {
		let rdns = attributes
			.into_iter()
			.map(|(ty, value)| {
				RelativeDistinguishedName::new(vec![AttributeTypeAndValue::new(ty, value)])
			})
			.collect();
		Self { rdns }
	}
	/// The relative distinguished names, outermost first
	pub fn rdns(&self) -> &[RelativeDistinguishedName] {
		&self.rdns
	}
	/// Iterate over every attribute, in sequence order and then set order
	pub fn attributes(&self) -> impl Iterator<Item = &AttributeTypeAndValue> {
		self.rdns.iter().flat_map(|rdn| rdn.iter())
	}
	/// Returns the value of the first attribute of the given type
	pub fn find(&self, attribute_type: &[u64]) -> Option<&AttributeValue> {
		self.attributes()
			.find(|attr| oid::is(&attr.attribute_type, attribute_type))
			.map(|attr| &attr.value)
	}

	pub(crate) fn read(reader: BERReader) -> ASN1Result<Self> {
		let mut rdns = Vec::new();
		reader.read_sequence_of(|reader| {
			rdns.push(RelativeDistinguishedName::read(reader)?);
			Ok(())
		})?;
		Ok(Self { rdns })
	}

	pub(crate) fn write(&self, writer: DERWriter) {
		writer.write_sequence(|writer| {
			for rdn in &self.rdns {
				rdn.write(writer.next());
			}
		})
	}
}

impl fmt::Display for Name {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, attr) in self.attributes().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			match oid::name_of(&attr.attribute_type) {
				Some(name) => write!(f, "{name}={}", attr.value)?,
				None => write!(f, "{}={}", attr.attribute_type, attr.value)?,
			}
		}
		Ok(())
	}
}

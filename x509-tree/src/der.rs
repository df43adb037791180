//! Helpers shared by the DER readers and writers of the certificate tree.

use time::OffsetDateTime;
use yasna::models::{GeneralizedTime, UTCTime};
use yasna::tags::{TAG_GENERALIZEDTIME, TAG_UTCTIME};
use yasna::{ASN1Error, ASN1ErrorKind, ASN1Result, BERReader, DERWriter, Tag};

use crate::Error;

pub(crate) fn invalid<T>() -> ASN1Result<T> {
	Err(ASN1Error::new(ASN1ErrorKind::Invalid))
}

/// Parses a complete DER document, rejecting trailing data.
///
/// Any ASN.1 failure is reported as `on_error`, the reason is only logged.
pub(crate) fn parse<'a, T, F>(der: &'a [u8], on_error: Error, callback: F) -> Result<T, Error>
where
	F: for<'b> FnOnce(BERReader<'a, 'b>) -> ASN1Result<T>,
{
	yasna::parse_der(der, callback).map_err(|e| {
		log::debug!("DER decoding of {} bytes failed: {e}", der.len());
		on_error
	})
}

/// Reads a UTCTime or GeneralizedTime as seconds since the epoch
pub(crate) fn read_time(mut reader: BERReader) -> ASN1Result<i64> {
	let tag = reader.lookahead_tag()?;
	if tag == TAG_UTCTIME {
		Ok(reader.read_utctime()?.datetime().unix_timestamp())
	} else if tag == TAG_GENERALIZEDTIME {
		Ok(reader.read_generalized_time()?.datetime().unix_timestamp())
	} else {
		invalid()
	}
}

/// Writes seconds since the epoch as the time type RFC 5280 mandates for the year
pub(crate) fn write_time(writer: DERWriter, timestamp: i64) -> Result<(), Error> {
	let dt = OffsetDateTime::from_unix_timestamp(timestamp)
		.map_err(|_| Error::InvalidValidityTimestamp(timestamp))?;
	// RFC 5280 requires CAs to write certificate validity dates
	// below 2050 as UTCTime, and anything starting from 2050
	// as GeneralizedTime [1]. UTCTime can't represent dates before
	// 1950 either, so those become GeneralizedTime as well.
	// [1]: https://tools.ietf.org/html/rfc5280#section-4.1.2.5
	if (1950..2050).contains(&dt.year()) {
		writer.write_utctime(&UTCTime::from_datetime(dt));
	} else if (0..=9999).contains(&dt.year()) {
		writer.write_generalized_time(&GeneralizedTime::from_datetime(dt));
	} else {
		return Err(Error::InvalidValidityTimestamp(timestamp));
	}
	Ok(())
}

/// Reads the full encoding of an element carrying the context specific `tag`.
///
/// Fails without consuming input when the next element has another tag, so
/// it can be used inside `read_optional`.
pub(crate) fn read_context_der(mut reader: BERReader, tag: u64) -> ASN1Result<Vec<u8>> {
	if reader.lookahead_tag()? != Tag::context(tag) {
		return invalid();
	}
	reader.read_der()
}

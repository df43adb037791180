#![allow(dead_code)]

use ring::rand::SystemRandom;
use ring::signature::{EcdsaKeyPair, KeyPair, ECDSA_P256_SHA256_ASN1_SIGNING};
use x509_tree::{
	oid, AlgorithmIdentifier, AlgorithmParameters, AttributeValue, BitString, Certificate, Name,
	ObjectIdentifier, SerialNumber, SignatureAlgorithm, SubjectPublicKeyInfo, TbsCertificate,
	Validity,
};

/// RSA 4096 self-signed certificate for example.com, sha256WithRSAEncryption
pub const RSA_SELF_SIGNED_PEM: &str = include_str!("data/rsa_self_signed.pem");
/// P-256 root CA, ecdsa-with-SHA256, valid until 2051
pub const CA_EC_PEM: &str = include_str!("data/ca_ec.pem");
/// P-256 leaf issued by [`CA_EC_PEM`], with subject alternative names
pub const LEAF_EC_PEM: &str = include_str!("data/leaf_ec.pem");
/// P-384 self-signed certificate using ecdsa-with-SHA384
pub const P384_EC_PEM: &str = include_str!("data/p384_ec.pem");

pub fn der_of(pem_str: &str) -> Vec<u8> {
	pem::parse(pem_str).unwrap().into_contents()
}

pub fn rsa_self_signed() -> Certificate {
	Certificate::from_pem(RSA_SELF_SIGNED_PEM).unwrap()
}

pub fn ca_ec() -> Certificate {
	Certificate::from_pem(CA_EC_PEM).unwrap()
}

pub fn leaf_ec() -> Certificate {
	Certificate::from_pem(LEAF_EC_PEM).unwrap()
}

pub fn p384_ec() -> Certificate {
	Certificate::from_pem(P384_EC_PEM).unwrap()
}

/// A fresh P-256 key pair together with its `SubjectPublicKeyInfo`
pub fn p256_key() -> (EcdsaKeyPair, SubjectPublicKeyInfo) {
	let rng = SystemRandom::new();
	let pkcs8 = EcdsaKeyPair::generate_pkcs8(&ECDSA_P256_SHA256_ASN1_SIGNING, &rng).unwrap();
	let key_pair =
		EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_ASN1_SIGNING, pkcs8.as_ref(), &rng).unwrap();
	let spki = SubjectPublicKeyInfo::new(
		AlgorithmIdentifier::new(
			ObjectIdentifier::from_slice(oid::EC_PUBLIC_KEY),
			Some(AlgorithmParameters::Oid(ObjectIdentifier::from_slice(
				oid::EC_SECP_256_R1,
			))),
		),
		BitString::from_bytes(key_pair.public_key().as_ref()),
	);
	(key_pair, spki)
}

pub fn name(cn: &str) -> Name {
	Name::from_attributes([
		(
			ObjectIdentifier::from_slice(oid::COUNTRY_NAME),
			AttributeValue::PrintableString("BR".into()),
		),
		(ObjectIdentifier::from_slice(oid::COMMON_NAME), cn.into()),
	])
}

/// A body issued by `issuer` for `subject_key`, naming ECDSA with SHA-256
pub fn tbs(issuer: &str, subject: &str, subject_key: &SubjectPublicKeyInfo) -> TbsCertificate {
	TbsCertificate::new(
		SerialNumber::from(0x2a),
		SignatureAlgorithm::Sha256WithEcdsa.identifier(),
		name(issuer),
		Validity::new(1_704_844_800, 2_020_464_000),
		name(subject),
		subject_key.clone(),
	)
}

/// Signs `tbs` with `key_pair`, using the signature algorithm named inside it as the outer one
pub fn sign(tbs: TbsCertificate, key_pair: &EcdsaKeyPair) -> Certificate {
	let outer = tbs.signature().clone();
	sign_with_outer(tbs, key_pair, outer)
}

pub fn sign_with_outer(
	tbs: TbsCertificate,
	key_pair: &EcdsaKeyPair,
	outer: AlgorithmIdentifier,
) -> Certificate {
	let msg = tbs.to_der().unwrap();
	let signature = key_pair.sign(&SystemRandom::new(), &msg).unwrap();
	Certificate::new(tbs, outer, BitString::from_bytes(signature.as_ref()))
}

/// Copies `tbs`, replacing serial number and validity
pub fn tampered(tbs: &TbsCertificate, serial: SerialNumber, validity: Validity) -> TbsCertificate {
	TbsCertificate::new(
		serial,
		tbs.signature().clone(),
		tbs.issuer().clone(),
		validity,
		tbs.subject().clone(),
		tbs.subject_public_key_info().clone(),
	)
	.with_version(tbs.version())
	.with_unique_ids(
		tbs.issuer_unique_id().cloned(),
		tbs.subject_unique_id().cloned(),
	)
	.with_extensions(tbs.extensions().to_vec())
}

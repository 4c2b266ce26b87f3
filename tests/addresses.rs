//! Address derivation and validation against independently computed fixtures.

#![cfg(feature = "std")]

mod util;

use btc_paykit::address::{self, is_valid};
use btc_paykit::bitcoin::hex::DisplayHex;
use btc_paykit::bitcoin::Network;
use btc_paykit::{Address, AddressType, ErrorKind, NetworkParams, PrivateKey};

use crate::util::{derive, generator_key, mainnet_key, PUBKEY, WIF};

#[test]
fn fixture_key_material() {
    let key = mainnet_key();
    assert_eq!(key.public_key_bytes().to_lower_hex_string(), PUBKEY);
    assert_eq!(key.to_wif(), WIF);
}

#[test]
fn fixture_key_mainnet_addresses() {
    let key = mainnet_key();

    assert_eq!(derive(&key, AddressType::P2pkh).as_str(), "1PcpBoN99DKeAjUF7Xpjf4ybVvKiP7srqS");
    assert_eq!(derive(&key, AddressType::P2shP2wpkh).as_str(), "3PvWM4ch5mwjuFy8bTVFQg6FFLsZKqEkSb");
    assert_eq!(
        derive(&key, AddressType::P2wpkh).as_str(),
        "bc1qlqvtwpu2servhtchh26f9u09uav2w835tdxl59"
    );
    assert_eq!(
        derive(&key, AddressType::P2tr).as_str(),
        "bc1py69cekw6sczcm2cxlnfa7r6kxgcr97yetxupfpet47wyxvx678tq2sgahd"
    );
}

#[test]
fn fixture_key_testnet_addresses() {
    let key = PrivateKey::from_secret_key(*mainnet_key().secret_key(), NetworkParams::testnet());

    assert_eq!(derive(&key, AddressType::P2pkh).as_str(), "n48mUrT7xEktwqwrq6o7UzBvMuvREw9tvp");
    assert_eq!(derive(&key, AddressType::P2shP2wpkh).as_str(), "2NFUiQoYihET673bgGb782d5WTh5j6KUTTB");
    assert_eq!(
        derive(&key, AddressType::P2wpkh).as_str(),
        "tb1qlqvtwpu2servhtchh26f9u09uav2w835ptav0k"
    );
    assert_eq!(
        derive(&key, AddressType::P2tr).as_str(),
        "tb1py69cekw6sczcm2cxlnfa7r6kxgcr97yetxupfpet47wyxvx678tqac7jdz"
    );
}

#[test]
fn generator_key_addresses() {
    let key = generator_key(NetworkParams::testnet());

    assert_eq!(derive(&key, AddressType::P2pkh).as_str(), "mrCDrCybB6J1vRfbwM5hemdJz73FwDBC8r");
    assert_eq!(derive(&key, AddressType::P2shP2wpkh).as_str(), "2NAUYAHhujozruyzpsFRP63mbrdaU5wnEpN");
    assert_eq!(
        derive(&key, AddressType::P2wpkh).as_str(),
        "tb1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx"
    );
    assert_eq!(
        derive(&key, AddressType::P2tr).as_str(),
        "tb1pmfr3p9j00pfxjh0zmgp99y8zftmd3s5pmedqhyptwy6lm87hf5ssk79hv2"
    );

    let key = generator_key(NetworkParams::from(Network::Regtest));
    assert_eq!(
        derive(&key, AddressType::P2wpkh).as_str(),
        "bcrt1qw508d6qejxtdg4y5r3zarvary0c5xw7kygt080"
    );
}

#[test]
fn derivation_is_deterministic() {
    let key = mainnet_key();
    for ty in AddressType::ALL {
        assert_eq!(derive(&key, ty), derive(&key, ty));
    }
}

#[test]
fn derived_addresses_validate_and_round_trip() {
    let key = mainnet_key();
    let net = NetworkParams::bitcoin();

    for ty in AddressType::ALL {
        let addr = derive(&key, ty);
        assert!(is_valid(addr.as_str(), &net), "{} should be valid", addr);

        let script = address::to_output_script(addr.as_str(), &net).unwrap();
        assert_eq!(script, addr.script_pubkey());
        assert_eq!(script.as_bytes()[..], addr.script_pubkey().as_bytes()[..]);
    }
}

#[test]
fn invalid_addresses() {
    let net = NetworkParams::bitcoin();

    for s in [
        "",
        // Corrupted checksum character.
        "1PcpBoN99DKeAjUF7Xpjf4ybVvKiP7srqT",
        // Testnet address.
        "tb1qlqvtwpu2servhtchh26f9u09uav2w835ptav0k",
        "n48mUrT7xEktwqwrq6o7UzBvMuvREw9tvp",
        // A 20 byte hex string with a foreign prefix.
        "0xdadb0d80178819f2319190d340ce9a924f783711",
        // Litecoin.
        "LhqmT1fyDsZhRYAQHfp2w63Mi8gzSqxqQH",
    ] {
        assert!(!is_valid(s, &net), "{:?} should be invalid", s);
    }
}

#[test]
fn parse_errors_map_to_invalid_address() {
    let err = Address::from_str_network("not an address", &NetworkParams::bitcoin()).unwrap_err();
    assert_eq!(btc_paykit::Error::from(err).kind(), ErrorKind::InvalidAddress);
}

#[test]
fn unknown_selector_is_invalid_argument() {
    let err = AddressType::try_from(7).unwrap_err();
    assert_eq!(btc_paykit::Error::from(err).kind(), ErrorKind::InvalidArgument);

    let err = "p2pk".parse::<AddressType>().unwrap_err();
    assert_eq!(btc_paykit::Error::from(err).kind(), ErrorKind::InvalidArgument);
}

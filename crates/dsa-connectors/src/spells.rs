/// This module encodes spells, the steps of a batch that a DSA account runs
/// atomically through `cast(string[] targets, bytes[] datas, address origin)`.
///
/// Spells run in order against the account's shared "set id" registers, so a
/// spell that reads a set id depends on an earlier spell that wrote it. The
/// encoder keeps the order but doesn't check those dependencies.
use std::collections::HashMap;

use dsa_wrappers::wrappers::{
    connect_v2_aave_v1::ConnectV2AaveV1Calls, connect_v2_aave_v2::ConnectV2AaveV2Calls,
};
use ethers::{
    abi::{Abi, AbiEncode, Token},
    types::Bytes,
};
use eyre::{eyre, Result, WrapErr};

/// The call a spell makes on its connector.
#[derive(Clone, Debug, PartialEq)]
pub enum SpellCall {
    AaveV1(ConnectV2AaveV1Calls),
    AaveV2(ConnectV2AaveV2Calls),
    /// A call on a connector without typed bindings. The arguments are
    /// checked against the ABI registered for the connector when encoding.
    Dynamic { method: String, args: Vec<Token> },
}

/// One step of a batch: a call on the connector enabled under `connector`.
#[derive(Clone, Debug, PartialEq)]
pub struct Spell {
    pub connector: String,
    pub call: SpellCall,
}

impl Spell {
    pub fn aave_v1<S: Into<String>>(connector: S, call: ConnectV2AaveV1Calls) -> Self {
        Self {
            connector: connector.into(),
            call: SpellCall::AaveV1(call),
        }
    }

    pub fn aave_v2<S: Into<String>>(connector: S, call: ConnectV2AaveV2Calls) -> Self {
        Self {
            connector: connector.into(),
            call: SpellCall::AaveV2(call),
        }
    }

    pub fn dynamic<S: Into<String>, M: Into<String>>(
        connector: S,
        method: M,
        args: Vec<Token>,
    ) -> Self {
        Self {
            connector: connector.into(),
            call: SpellCall::Dynamic {
                method: method.into(),
                args,
            },
        }
    }
}

/// The arguments of `cast`: connector names and calldata, in spell order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CastArgs {
    pub targets: Vec<String>,
    pub datas: Vec<Bytes>,
}

impl CastArgs {
    pub fn into_parts(self) -> (Vec<String>, Vec<Bytes>) {
        (self.targets, self.datas)
    }
}

/// Encodes spells into `cast` arguments.
#[derive(Clone, Debug, Default)]
pub struct SpellEncoder {
    abis: HashMap<String, Abi>,
}

impl SpellEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the ABI used to encode dynamic calls on `connector`.
    pub fn with_abi<S: Into<String>>(mut self, connector: S, abi: Abi) -> Self {
        self.abis.insert(connector.into(), abi);
        self
    }

    /// Encodes the spells in order. Every spell is validated before anything
    /// is returned, so a malformed spell never reaches the chain.
    pub fn encode(&self, spells: &[Spell]) -> Result<CastArgs> {
        let mut args = CastArgs::default();
        for (i, spell) in spells.iter().enumerate() {
            let data = self
                .encode_call(spell)
                .wrap_err_with(|| format!("failed to encode spell {} on {}", i, spell.connector))?;
            args.targets.push(spell.connector.clone());
            args.datas.push(data);
        }
        Ok(args)
    }

    fn encode_call(&self, spell: &Spell) -> Result<Bytes> {
        if spell.connector.is_empty() {
            return Err(eyre!("spell has no connector name"));
        }
        match &spell.call {
            SpellCall::AaveV1(call) => Ok(call.clone().encode().into()),
            SpellCall::AaveV2(call) => Ok(call.clone().encode().into()),
            SpellCall::Dynamic { method, args } => {
                let abi = self
                    .abis
                    .get(&spell.connector)
                    .ok_or_else(|| eyre!("no ABI registered for {}", spell.connector))?;
                let function = abi.function(method)?;
                Ok(function.encode_input(args)?.into())
            }
        }
    }
}

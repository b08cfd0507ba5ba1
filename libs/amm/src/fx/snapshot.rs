//! Per-query view of a pool pair
//!
//! A [`PairSnapshot`] is built fresh for every swap or pricing query and never
//! mutated. Construction fails when a reference rate is zero, so the solver
//! never sees a pair it cannot price.

use super::errors::{CurveMathError, Result};
use super::numeraire::Numeraire;
use super::params::CurveParameters;
use super::trade_solver::CurveState;
use alloy_primitives::{Address, U256};
use types::{FixedPoint18, TokenAmount};

/// One leg of the pair: balance in native units plus its reference rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenState {
    pub address: Address,
    pub balance: TokenAmount,
    /// Price of one whole token in numeraire
    pub rate: FixedPoint18,
}

impl TokenState {
    pub fn new(address: Address, raw_balance: U256, decimals: u8, rate: FixedPoint18) -> Self {
        Self {
            address,
            balance: TokenAmount::new(raw_balance, decimals),
            rate,
        }
    }

    pub fn decimals(&self) -> u8 {
        self.balance.decimals
    }

    /// Balance expressed in numeraire
    pub fn numeraire_balance(&self) -> Result<FixedPoint18> {
        Numeraire::to_numeraire(self.balance.raw_amount, self.decimals(), self.rate)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairSnapshot {
    pub pool_id: String,
    pub token_in: TokenState,
    pub token_out: TokenState,
    pub params: CurveParameters,
    token_in_is_anchor: bool,
}

impl PairSnapshot {
    /// Assemble a snapshot; `quote_token` names the numeraire anchor leg
    pub fn new(
        pool_id: impl Into<String>,
        token_in: TokenState,
        token_out: TokenState,
        quote_token: Address,
        params: CurveParameters,
    ) -> Result<Self> {
        if token_in.rate.is_zero() {
            return Err(CurveMathError::missing(format!("reference rate of {}", token_in.address)));
        }
        if token_out.rate.is_zero() {
            return Err(CurveMathError::missing(format!(
                "reference rate of {}",
                token_out.address
            )));
        }

        let token_in_is_anchor = token_in.address == quote_token;
        let same_token = token_in.address == token_out.address;
        if !token_in_is_anchor && token_out.address != quote_token && !same_token {
            return Err(CurveMathError::missing("quoteToken"));
        }

        Ok(Self {
            pool_id: pool_id.into(),
            token_in,
            token_out,
            params,
            token_in_is_anchor,
        })
    }

    pub fn is_same_token(&self) -> bool {
        self.token_in.address == self.token_out.address
    }

    /// Curve leg of the token going in (0 is the anchor leg)
    pub fn token_in_index(&self) -> usize {
        if self.token_in_is_anchor {
            0
        } else {
            1
        }
    }

    pub fn token_out_index(&self) -> usize {
        1 - self.token_in_index()
    }

    /// Reference rate of the non-anchor (base) token
    pub fn anchor_rate(&self) -> FixedPoint18 {
        if self.token_in_is_anchor {
            self.token_out.rate
        } else {
            self.token_in.rate
        }
    }

    /// Numeraire balances, anchor leg first
    pub fn curve_state(&self) -> Result<CurveState> {
        let token_in = self.token_in.numeraire_balance()?;
        let token_out = self.token_out.numeraire_balance()?;
        if self.token_in_is_anchor {
            CurveState::new(token_in, token_out)
        } else {
            CurveState::new(token_out, token_in)
        }
    }
}

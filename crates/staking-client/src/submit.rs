//! Signing and submission with local keypairs.

use crate::{Error, Result, instructions::AtomicGroup, program_error::program_failure};
use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_pubkey::Pubkey;
use solana_sdk::{
    instruction::Instruction,
    message::Message,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};
use std::sync::Arc;

/// Instructions to be sent in one transaction.
#[derive(Debug, Default)]
pub struct Instructions {
    pub fee_payer: Pubkey,
    pub signers: Vec<Keypair>,
    pub instructions: Vec<Instruction>,
}

impl Instructions {
    pub fn new(payer: Keypair, instructions: Vec<Instruction>) -> Self {
        Self {
            fee_payer: payer.pubkey(),
            signers: vec![payer],
            instructions,
        }
    }

    pub fn push_group(&mut self, group: AtomicGroup) {
        self.instructions.extend(group);
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, instructions: Instructions) -> Result<Signature>;
}

pub struct RpcSubmitter {
    rpc: Arc<RpcClient>,
}

impl RpcSubmitter {
    pub fn new(rpc: Arc<RpcClient>) -> Self {
        Self { rpc }
    }

    /// Unsigned transaction, after checking the fee payer can cover the fee.
    async fn prepare(&self, instructions: &Instructions) -> Result<Transaction> {
        let recent_blockhash = self.rpc.get_latest_blockhash().await?;

        let message = Message::new_with_blockhash(
            &instructions.instructions,
            Some(&instructions.fee_payer),
            &recent_blockhash,
        );

        let balance = self.rpc.get_balance(&instructions.fee_payer).await?;

        let needed = self.rpc.get_fee_for_message(&message).await?;

        if balance < needed {
            return Err(Error::InsufficientBalance { needed, balance });
        }

        Ok(Transaction::new_unsigned(message))
    }
}

#[async_trait]
impl Submitter for RpcSubmitter {
    async fn submit(&self, instructions: Instructions) -> Result<Signature> {
        if instructions.is_empty() {
            return Err(Error::custom(anyhow::anyhow!("no instructions to submit")));
        }

        let mut tx = self.prepare(&instructions).await?;
        let recent_blockhash = tx.message.recent_blockhash;
        let signers = instructions.signers.iter().collect::<Vec<_>>();
        tx.try_sign(signers.as_slice(), recent_blockhash)?;

        tracing::info!(
            "submitting {} instruction(s), fee payer {}",
            instructions.instructions.len(),
            instructions.fee_payer
        );
        match self.rpc.send_and_confirm_transaction(&tx).await {
            Ok(signature) => {
                tracing::info!("confirmed {}", signature);
                Ok(signature)
            }
            Err(error) => match program_failure(&error) {
                Some(failure) => {
                    tracing::error!("program rejected transaction: {}", failure);
                    Err(Error::Program(failure))
                }
                None => Err(Error::SolanaClient(error)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_group() {
        let mut ins = Instructions::new(Keypair::new(), vec![]);
        assert!(ins.is_empty());
        let ix = Instruction::new_with_bytes(crate::ID, &[1], vec![]);
        ins.push_group(AtomicGroup::new(vec![ix.clone(), ix]));
        assert_eq!(ins.instructions.len(), 2);
    }
}

use clap::{Parser, Subcommand};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_pubkey::Pubkey;
use solana_sdk::{
    instruction::Instruction,
    signature::Keypair,
    signer::Signer,
};
use staking_client::{
    Error, Result, StakingClient,
    config::Config,
    creator::OnChainMetadata,
    instructions::{AtomicGroup, stake::select_base_lock, whitelist::RewardRate},
    ledger::{self, find_active_stake_receipts, find_farm_locks, find_user_stake_receipts},
    pda::{self, EntityKind, SeedInputs},
    state::{LockConfig, WhitelistType},
    submit::{Instructions, RpcSubmitter, Submitter},
    translate_error,
};
use std::{path::PathBuf, sync::Arc};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "staking")]
struct Args {
    /// Path to TOML config file
    #[arg(long, short)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Derive the address of a program account
    Address {
        kind: EntityKind,
        #[arg(long)]
        authority: Option<Pubkey>,
        #[arg(long)]
        reward_mint: Option<Pubkey>,
        #[arg(long)]
        farm: Option<Pubkey>,
        #[arg(long)]
        manager_authority: Option<Pubkey>,
        /// duration:bonus_factor:cooldown
        #[arg(long)]
        lock_config: Option<LockConfig>,
        #[arg(long)]
        creator_or_mint: Option<Pubkey>,
        #[arg(long)]
        owner: Option<Pubkey>,
        #[arg(long)]
        farmer: Option<Pubkey>,
        #[arg(long)]
        mint: Option<Pubkey>,
    },
    /// Print the message of a program error code
    ExplainError { code: u32 },
    /// List the locks of the configured farm
    Locks,
    /// List stake receipts, newest first
    Receipts {
        /// Defaults to the configured keypair
        #[arg(long)]
        owner: Option<Pubkey>,
        /// Only receipts that are still earning
        #[arg(long)]
        active: bool,
    },
    /// Create the farmer account
    InitFarmer,
    /// Stake one or more tokens
    Stake {
        #[arg(required = true)]
        mints: Vec<Pubkey>,
        #[arg(long, default_value_t = 1)]
        amount: u64,
        /// Defaults to the farm's base lock
        #[arg(long)]
        lock: Option<Pubkey>,
    },
    Unstake { mint: Pubkey },
    /// Claim accrued rewards
    Claim,
    /// Attach an object to a staked token
    AddObject { mint: Pubkey, object: Pubkey },
    /// Detach an object from a staked token
    RemoveObject { mint: Pubkey, object: Pubkey },
    /// Create a farm owned by the configured keypair
    CreateFarm { reward_mint: Pubkey },
    /// Let another key manage the configured farm
    AddManager { manager: Pubkey },
    /// Create lock tiers, each duration:bonus_factor:cooldown
    CreateLocks {
        #[arg(required = true)]
        configs: Vec<LockConfig>,
    },
    /// Move reward tokens into the farm vault
    Fund { amount: u64 },
    /// Whitelist a creator, mint or object
    WhitelistAdd {
        address: Pubkey,
        /// creator, mint or associated_object
        #[arg(long = "type", default_value = "creator")]
        whitelist_type: WhitelistType,
        /// Reward paid per interval
        #[arg(long)]
        token_amount: u64,
        #[arg(long, default_value_t = 1)]
        interval: u64,
    },
    WhitelistRemove { address: Pubkey },
}

/// One transaction holding every instruction of `group`.
fn group_transaction(payer: Keypair, group: AtomicGroup) -> Instructions {
    let mut instructions = Instructions::new(payer, vec![]);
    instructions.push_group(group);
    instructions
}

struct Context {
    config: Config,
    rpc: Arc<RpcClient>,
}

impl Context {
    fn new(config: Config) -> Result<Self> {
        let rpc = RpcClient::new_with_commitment(config.rpc_url.clone(), config.commitment_config()?);
        Ok(Self {
            config,
            rpc: Arc::new(rpc),
        })
    }

    fn client(&self) -> StakingClient<Arc<RpcClient>, OnChainMetadata<Arc<RpcClient>>> {
        StakingClient::new(self.rpc.clone(), OnChainMetadata::new(self.rpc.clone()))
    }

    fn farm(&self) -> Result<Pubkey> {
        let farm = self.config.farm()?;
        Ok(pda::find_farm(&farm.authority, &farm.reward_mint))
    }

    async fn submit(&self, instructions: Vec<Instruction>) -> Result<()> {
        let payer = self.config.keypair()?;
        self.submit_instructions(Instructions::new(payer, instructions)).await
    }

    async fn submit_instructions(&self, instructions: Instructions) -> Result<()> {
        let signature = RpcSubmitter::new(self.rpc.clone())
            .submit(instructions)
            .await?;
        println!("{}", signature);
        Ok(())
    }
}

async fn run(args: Args) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;
    let ctx = Context::new(config)?;

    match args.command {
        Commands::Address {
            kind,
            authority,
            reward_mint,
            farm,
            manager_authority,
            lock_config,
            creator_or_mint,
            owner,
            farmer,
            mint,
        } => {
            let seeds = SeedInputs {
                authority,
                reward_mint,
                farm,
                manager_authority,
                lock_config,
                creator_or_mint,
                owner,
                farmer,
                mint,
            };
            println!("{}", pda::derive(kind, &seeds)?);
        }
        Commands::ExplainError { code } => match translate_error(code) {
            Some(error) => println!("{} {}: {}", code, error.name(), error),
            None => println!("{}: unrecognized error code", code),
        },
        Commands::Locks => {
            let farm = ctx.farm()?;
            let locks = find_farm_locks(&*ctx.rpc, &farm).await?;
            let base = select_base_lock(&locks);
            for (address, lock) in &locks {
                let LockConfig {
                    duration,
                    bonus_factor,
                    cooldown,
                } = lock.config;
                println!(
                    "{} duration={} bonus_factor={} cooldown={}{}",
                    address,
                    duration,
                    bonus_factor,
                    cooldown,
                    if Some(*address) == base { " (base)" } else { "" }
                );
            }
        }
        Commands::Receipts { owner, active } => {
            let farm = ctx.farm()?;
            let owner = match owner {
                Some(owner) => owner,
                None => ctx.config.keypair()?.pubkey(),
            };
            let receipts = if active {
                find_active_stake_receipts(&*ctx.rpc, &farm, &owner).await?
            } else {
                find_user_stake_receipts(&*ctx.rpc, &farm, &owner).await?
            };
            for (address, receipt) in receipts {
                println!(
                    "{} mint={} lock={} start={} end={} objects={}",
                    address,
                    receipt.mint,
                    receipt.lock,
                    receipt.start_ts,
                    receipt
                        .end_ts
                        .map_or_else(|| "-".to_owned(), |t| t.to_string()),
                    receipt.objects.len(),
                );
            }
        }
        Commands::InitFarmer => {
            let farm = ctx.farm()?;
            let owner = ctx.config.keypair()?.pubkey();
            match ctx.client().ensure_farmer(&farm, &owner).await? {
                Some(ix) => ctx.submit(vec![ix]).await?,
                None => println!("farmer {} already exists", pda::find_farmer(&farm, &owner)),
            }
        }
        Commands::Stake {
            mints,
            amount,
            lock,
        } => {
            let farm = ctx.farm()?;
            let owner = ctx.config.keypair()?.pubkey();
            let client = ctx.client();
            let lock = match lock {
                Some(lock) => lock,
                None => client.base_lock(&farm).await?,
            };
            let mut instructions = client
                .ensure_farmer(&farm, &owner)
                .await?
                .into_iter()
                .collect::<Vec<_>>();
            instructions.extend(client.stake_all(&farm, &owner, &mints, &lock, amount).await?);
            ctx.submit(instructions).await?;
        }
        Commands::Unstake { mint } => {
            let farm = ctx.farm()?;
            let owner = ctx.config.keypair()?.pubkey();
            let ix = ctx.client().unstake(&farm, &owner, &mint).await?;
            ctx.submit(vec![ix]).await?;
        }
        Commands::Claim => {
            let farm = ctx.farm()?;
            let owner = ctx.config.keypair()?.pubkey();
            if ledger::fetch::<staking_client::state::Farmer>(&*ctx.rpc, &pda::find_farmer(&farm, &owner))
                .await?
                .is_none()
            {
                return Err(Error::custom(anyhow::anyhow!(
                    "{} has no farmer account in {}",
                    owner,
                    farm
                )));
            }
            let ix = ctx.client().claim_rewards(&farm, &owner).await?;
            ctx.submit(vec![ix]).await?;
        }
        Commands::AddObject { mint, object } => {
            let farm = ctx.farm()?;
            let owner = ctx.config.keypair()?.pubkey();
            let ix = ctx.client().add_object(&farm, &owner, &mint, &object).await?;
            ctx.submit(vec![ix]).await?;
        }
        Commands::RemoveObject { mint, object } => {
            let farm = ctx.farm()?;
            let owner = ctx.config.keypair()?.pubkey();
            let ix = ctx
                .client()
                .remove_object(&farm, &owner, &mint, &object)
                .await?;
            ctx.submit(vec![ix]).await?;
        }
        Commands::CreateFarm { reward_mint } => {
            let payer = ctx.config.keypair()?;
            let authority = payer.pubkey();
            let group = ctx.client().create_farm(&authority, &reward_mint).await?;
            tracing::info!("creating farm {}", pda::find_farm(&authority, &reward_mint));
            ctx.submit_instructions(group_transaction(payer, group)).await?;
        }
        Commands::AddManager { manager } => {
            let farm = ctx.farm()?;
            let authority = ctx.config.keypair()?.pubkey();
            let ix = ctx.client().add_manager(&farm, &authority, &manager).await?;
            ctx.submit(vec![ix]).await?;
        }
        Commands::CreateLocks { configs } => {
            let farm = ctx.farm()?;
            let authority = ctx.config.keypair()?.pubkey();
            let ix = ctx.client().create_locks(&farm, &authority, &configs).await?;
            ctx.submit(vec![ix]).await?;
        }
        Commands::Fund { amount } => {
            let farm = ctx.farm()?;
            let authority = ctx.config.keypair()?.pubkey();
            let ix = ctx.client().fund_reward(&farm, &authority, amount).await?;
            ctx.submit(vec![ix]).await?;
        }
        Commands::WhitelistAdd {
            address,
            whitelist_type,
            token_amount,
            interval,
        } => {
            let farm = ctx.farm()?;
            let authority = ctx.config.keypair()?.pubkey();
            let reward_rate = RewardRate {
                token_amount,
                interval_in_seconds: interval,
            };
            let ix = ctx
                .client()
                .add_to_whitelist(&farm, &authority, &address, whitelist_type, reward_rate)
                .await?;
            ctx.submit(vec![ix]).await?;
        }
        Commands::WhitelistRemove { address } => {
            let farm = ctx.farm()?;
            let authority = ctx.config.keypair()?.pubkey();
            let ix = ctx
                .client()
                .remove_from_whitelist(&farm, &authority, &address)
                .await?;
            ctx.submit(vec![ix]).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = run(Args::parse()).await {
        if let Some(e) = error.staking_error() {
            tracing::debug!("program error {}", e.name());
        }
        eprintln!("error: {}", error);
        std::process::exit(1);
    }
}

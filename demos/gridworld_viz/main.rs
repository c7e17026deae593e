use std::{error::Error, thread};

use clap::Parser;
use gridq::{
    viz::{self, Reporter},
    CancelToken, Trainer,
};
use log::{error, info};

#[path = "../gridworld/args.rs"]
mod args;

use args::{AnyAgent, Args};

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let env = args.world()?;
    let trainer_config = args.trainer_config();
    trainer_config.validate()?;
    let episodes = trainer_config.episodes;

    let cancel = CancelToken::new();
    let (handle, tx) = viz::init(env.grid().clone(), args.agents, episodes, cancel.clone());

    thread::scope(|scope| {
        let handles = (0..args.agents)
            .map(|i| {
                let (args, env, tx) = (&args, &env, tx.clone());
                let (trainer_config, cancel) = (trainer_config.clone(), cancel.clone());
                scope.spawn(move || -> Result<(), String> {
                    let config = args.agent_config(i).map_err(|e| e.to_string())?;
                    let mut agent = AnyAgent::new(args.rule, env, config).map_err(|e| e.to_string())?;
                    let mut trainer = Trainer::new(trainer_config)
                        .map_err(|e| e.to_string())?
                        .with_cancel(cancel);
                    let mut spawn = args.spawner(i);
                    let mut reporter = Reporter::new(i, tx);

                    let outcome = match &mut agent {
                        AnyAgent::Q(agent) => trainer.train(agent, &mut *spawn, &mut reporter),
                        AnyAgent::Sarsa(agent) => trainer.train(agent, &mut *spawn, &mut reporter),
                    }
                    .map_err(|e| e.to_string())?;

                    info!("agent {i}: {outcome:?}");
                    Ok(())
                })
            })
            .collect::<Vec<_>>();

        for (i, handle) in handles.into_iter().enumerate() {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!("agent {i}: {e}"),
                Err(_) => error!("agent {i} panicked"),
            }
        }
    });

    // Training is over once every sender is gone, the view stays up until the user quits
    drop(tx);
    let _ = handle.join();
    Ok(())
}

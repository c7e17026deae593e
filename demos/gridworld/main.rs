use std::{error::Error, fs::File, thread};

use args::{AnyAgent, Args};
use clap::Parser;
use gridq::{Episode, Outcome, Silent, Trainer};
use log::info;

mod args;

struct Row {
    agent: usize,
    episode: usize,
    spawn: String,
    steps: usize,
    reward: f32,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let env = args.world()?;
    let trainer_config = args.trainer_config();
    trainer_config.validate()?;

    // One thread per agent, each with its own table
    let results = thread::scope(|scope| {
        let handles = (0..args.agents)
            .map(|i| {
                let (args, env, trainer_config) = (&args, &env, trainer_config.clone());
                scope.spawn(move || -> Result<_, String> {
                    let config = args.agent_config(i).map_err(|e| e.to_string())?;
                    let mut agent = AnyAgent::new(args.rule, env, config).map_err(|e| e.to_string())?;
                    let mut trainer = Trainer::new(trainer_config).map_err(|e| e.to_string())?;
                    let mut spawn = args.spawner(i);

                    let outcome = match &mut agent {
                        AnyAgent::Q(agent) => trainer.train(agent, &mut *spawn, &mut Silent),
                        AnyAgent::Sarsa(agent) => trainer.train(agent, &mut *spawn, &mut Silent),
                    }
                    .map_err(|e| e.to_string())?;

                    // Length of the learned route from the fixed spawn, or from the corner
                    let from = args.spawn.unwrap_or_default();
                    let limit = env.grid().width() * env.grid().height();
                    let greedy = match &agent {
                        AnyAgent::Q(agent) => agent.greedy_path(from, limit),
                        AnyAgent::Sarsa(agent) => agent.greedy_path(from, limit),
                    };
                    let reaches_goal = greedy.last() == Some(&env.goal());
                    info!(
                        "agent {i}: greedy route from {from} {} in {} steps",
                        if reaches_goal { "reaches the goal" } else { "does not reach the goal" },
                        greedy.len() - 1
                    );

                    Ok((i, outcome, trainer.history().to_vec()))
                })
            })
            .collect::<Vec<_>>();

        handles
            .into_iter()
            .map(|h| h.join().map_err(|_| String::from("agent thread panicked"))?)
            .collect::<Result<Vec<_>, String>>()
    })?;

    let mut rows = Vec::new();
    for (agent, outcome, history) in &results {
        if let Outcome::Completed { elapsed } = outcome {
            let tail = history.len().saturating_sub(10);
            let recent = history[tail..].iter().map(Episode::len).sum::<usize>() as f64
                / (history.len() - tail).max(1) as f64;
            info!(
                "agent {agent}: {} episodes in {elapsed:.2?}, last 10 averaged {recent:.1} steps",
                history.len()
            );
        }
        rows.extend(history.iter().enumerate().map(|(i, e)| Row {
            agent: *agent,
            episode: i,
            spawn: e.spawn().to_string(),
            steps: e.len(),
            reward: e.total_reward(),
        }));
    }

    if let Some(path) = &args.out {
        let mut wtr = csv::Writer::from_writer(File::create(path)?);
        wtr.write_record(["agent", "episode", "spawn", "steps", "reward"])?;
        for row in rows {
            wtr.write_record([
                row.agent.to_string(),
                row.episode.to_string(),
                row.spawn,
                row.steps.to_string(),
                row.reward.to_string(),
            ])?;
        }
        wtr.flush()?;
        info!("wrote {}", path.display());
    }

    Ok(())
}

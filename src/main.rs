//! Command-line front end for the minerva odds engine.

use std::error::Error;
use std::io::{self, Write};
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use itertools::Itertools;
use tracing_subscriber::EnvFilter;

use minerva::{
    sum_campaign_odds, sum_invasion_odds, Campaign, CampaignOutcome, Invasion, OutcomeMap, Troops,
};

#[derive(Parser, Debug)]
#[command(name = "minerva", about = "Calculates probabilities for Risk", version)]
struct Args {
    /// Number of attackers in the attack scenario
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    attackers: Troops,

    /// Defender troop count(s) in the attack scenario; more than one
    /// count selects campaign mode
    #[arg(required = true, num_args = 1.., value_parser = clap::value_parser!(u32).range(1..))]
    defenders: Vec<Troops>,

    /// Attacker count at or below which the attacker gives up; such
    /// outcomes count as unsuccessful
    #[arg(short, long, default_value_t = 0, value_name = "R")]
    retreat: Troops,

    /// Defender count the attacker wants to reach; outcomes at or below
    /// it count as successful
    #[arg(short, long, default_value_t = 0, value_name = "G")]
    goal: Troops,

    /// Prompt for battle results and print updated odds after each round
    #[arg(short, long)]
    interactive: bool,

    /// Verbosely print probabilities and unit counts
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    if let Err(message) = check_args(&args) {
        Args::command().error(ErrorKind::ValueValidation, message).exit();
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("minerva: {err}");
            ExitCode::FAILURE
        }
    }
}

fn check_args(args: &Args) -> Result<(), String> {
    if args.defenders.len() > 1 {
        if args.goal != 0 {
            return Err("'--goal' is incompatible with multiple defender troop counts".into());
        }
        if args.interactive {
            return Err("no interactive mode for multiple defender troop counts (yet)".into());
        }
        if args.verbose {
            return Err("no verbose mode for multiple defender troop counts (yet)".into());
        }
    }
    if args.retreat >= args.attackers {
        return Err("the argument '--retreat' must be less than 'attackers'".into());
    }
    if args.goal >= args.defenders[0] {
        return Err("the argument '--goal' must be less than 'defenders'".into());
    }
    Ok(())
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    if args.defenders.len() > 1 {
        print_campaign(args.attackers, &args.defenders, args.retreat);
        let outcome = Campaign::new(args.attackers, args.defenders.clone())
            .retreat(args.retreat)
            .eval()?;
        print_campaign_odds(&outcome);
    } else {
        let defenders = args.defenders[0];
        if args.interactive {
            interactive_invasion(args.attackers, defenders, args.retreat, args.goal, args.verbose)?;
        } else {
            print_invasion(args.attackers, defenders, args.retreat, args.goal, args.verbose);
            let outcomes = Invasion::new(args.attackers, defenders)
                .retreat(args.retreat)
                .goal(args.goal)
                .eval()?;
            print_invasion_odds(&outcomes, args.goal, args.verbose);
        }
    }
    Ok(())
}

fn print_invasion(attackers: Troops, defenders: Troops, retreat: Troops, goal: Troops, verbose: bool) {
    if verbose {
        let attack = match attackers {
            1 => "1 attacker".to_string(),
            n => format!("{n} attackers"),
        };
        let defense = match defenders {
            1 => "1 defender".to_string(),
            n => format!("{n} defenders"),
        };
        println!("{attack} vs. {defense}");

        if retreat != 0 {
            println!("The attacker wants to win with at least {retreat} units.");
        }
        if goal != 0 {
            println!("The attacker wants to reduce the defender to {goal} units.");
        }
    } else {
        println!("{attackers} vs. {defenders}");

        if retreat != 0 {
            println!("r: {retreat}");
        }
        if goal != 0 {
            println!("g: {goal}");
        }
    }
}

fn print_invasion_odds(outcomes: &OutcomeMap, goal: Troops, verbose: bool) {
    let percent = sum_invasion_odds(outcomes, goal) * 100.0;
    if verbose {
        println!("The invasion has a {percent:.1}% chance of success.");
    } else {
        println!("{percent:.1}%");
    }
}

fn print_campaign(attackers: Troops, targets: &[Troops], retreat: Troops) {
    println!("{attackers} vs. [{}]", targets.iter().join(", "));

    if retreat != 0 {
        println!("r: {retreat}");
    }
}

fn print_campaign_odds(outcome: &CampaignOutcome) {
    let percent = sum_campaign_odds(outcome) * 100.0;
    println!("{percent:.1}%");
}

/// Prompts for the result of each battle round and reprints the odds of
/// the updated scenario until one side reaches its threshold or the user
/// quits with `q`.
fn interactive_invasion(
    mut attackers: Troops,
    mut defenders: Troops,
    retreat: Troops,
    goal: Troops,
    verbose: bool,
) -> Result<(), Box<dyn Error>> {
    let mut quit = false;
    while attackers > retreat && defenders > goal {
        print_invasion(attackers, defenders, retreat, goal, verbose);
        let outcomes = Invasion::new(attackers, defenders)
            .retreat(retreat)
            .goal(goal)
            .eval()?;
        print_invasion_odds(&outcomes, goal, verbose);

        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            quit = true;
            break;
        }
        let command = line.trim();

        if command == "q" {
            quit = true;
            break;
        }

        // Units at stake this round: two, unless one side is down to one.
        let losses = attackers.min(defenders).min(2);
        match command {
            "a" => defenders -= losses,
            "d" => attackers -= losses,
            "t" if losses == 2 => {
                attackers -= 1;
                defenders -= 1;
            }
            _ => println!("'{command}' is not a valid command."),
        }
    }

    if !quit {
        // The invasion ran to one of its thresholds; report the standing.
        if verbose {
            if defenders > goal {
                match defenders {
                    1 => println!("The defender has won with 1 army."),
                    n => println!("The defender has won with {n} armies."),
                }
            } else {
                match attackers {
                    1 => println!("The attacker has won with 1 army."),
                    n => println!("The attacker has won with {n} armies."),
                }
            }
        } else {
            println!("{attackers} vs. {defenders}");
        }
    }
    Ok(())
}

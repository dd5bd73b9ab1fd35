//! Subcommand execution: parse, dispatch, write.

use crate::args::{parse_alternative, Args, Command};
use crate::csv_parser::parse_tables;
use crate::csv_writer::{write_columns, OutputDest};
use crate::error::Result;
use fast_fisher::BatchDispatcher;

/// Runs the parsed command line to completion.
pub fn run(args: &Args) -> Result<()> {
    let dispatcher = BatchDispatcher::with_config(args.exact_config()?)?;
    let dest = OutputDest::from_path(args.output_path());

    match &args.command {
        Command::Exact {
            input,
            alternative,
            odds_ratios,
            ..
        } => {
            let alternative = parse_alternative(alternative)?;
            let tables = parse_tables(input)?;
            tracing::info!(input = %input, tables = tables.len(), %alternative, "running exact test");

            if *odds_ratios {
                let (odds, p_values) = dispatcher.exact_with_odds_ratios(
                    &tables.a,
                    &tables.b,
                    &tables.c,
                    &tables.d,
                    alternative,
                )
                .map_err(|err| tables.locate(err))?;
                write_columns(
                    tables.ids.as_ref(),
                    &[("odds_ratio", odds.as_slice()), ("p_value", p_values.as_slice())],
                    &dest,
                )
            } else {
                let p_values =
                    dispatcher
                        .exact(&tables.a, &tables.b, &tables.c, &tables.d, alternative)
                        .map_err(|err| tables.locate(err))?;
                write_columns(
                    tables.ids.as_ref(),
                    &[("p_value", p_values.as_slice())],
                    &dest,
                )
            }
        }
        Command::All { input, .. } => {
            let tables = parse_tables(input)?;
            tracing::info!(input = %input, tables = tables.len(), "running exact test, all alternatives");

            let (less, greater, two_sided) =
                dispatcher
                    .exact_all(&tables.a, &tables.b, &tables.c, &tables.d)
                    .map_err(|err| tables.locate(err))?;
            write_columns(
                tables.ids.as_ref(),
                &[
                    ("less", less.as_slice()),
                    ("greater", greater.as_slice()),
                    ("two_sided", two_sided.as_slice()),
                ],
                &dest,
            )
        }
    }
}

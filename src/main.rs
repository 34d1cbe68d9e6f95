use std::collections::HashMap;
use std::sync::Arc;

use clap::{Arg, ArgAction, Command};
use declina::{
    Case, Declension, Gender, JsonDirSource, LabelSetLoader, LocalizerFactory, Number,
    RenamedNouns, Renameable, StartsWith,
};
use tracing::debug;

/// One `--rename` value: `NAME=Singular/Plural[:gender[:starts]]`.
#[derive(Debug, PartialEq)]
struct RenameArg {
    name: String,
    singular: String,
    plural: Option<String>,
    gender: Option<Gender>,
    starts_with: Option<StartsWith>,
}

fn parse_rename(value: &str) -> Result<RenameArg, String> {
    let (name, rest) = value
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=Singular/Plural, got '{}'", value))?;
    let mut parts = rest.split(':');
    let labels = parts.next().unwrap_or_default();
    let (singular, plural) = match labels.split_once('/') {
        Some((s, p)) => (s, Some(p.to_string())),
        None => (labels, None),
    };
    if name.trim().is_empty() || singular.trim().is_empty() {
        return Err(format!("empty name or label in '{}'", value));
    }
    let gender = parts.next().map(str::parse::<Gender>).transpose()?;
    let starts_with = parts.next().map(str::parse::<StartsWith>).transpose()?;
    Ok(RenameArg {
        name: name.trim().to_string(),
        singular: singular.to_string(),
        plural,
        gender,
        starts_with,
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("declina")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render grammatical labels from a directory of JSON label files")
        .arg(
            Arg::new("dir")
                .long("dir")
                .short('d')
                .help("Directory holding <locale>.json label files")
                .required(true),
        )
        .arg(
            Arg::new("locale")
                .help("Locale to render for (e.g. en_GB, de-AT)")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("section")
                .help("Label section")
                .required(true)
                .index(2),
        )
        .arg(Arg::new("key").help("Label key").required(true).index(3))
        .arg(
            Arg::new("args")
                .help("Values for $1, $2, ...")
                .num_args(0..)
                .index(4),
        )
        .arg(
            Arg::new("entity")
                .long("entity")
                .short('e')
                .help("Canonical entity name for {{entity:N}}, in order")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("rename")
                .long("rename")
                .short('r')
                .help("Rename an entity: NAME=Singular/Plural[:gender[:starts]]")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("Fail instead of rendering placeholders")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log label resolution")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let level = if matches.get_flag("verbose") { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.parse()?),
        )
        .init();

    let dir = matches.get_one::<String>("dir").ok_or("missing --dir")?;
    let locale = matches.get_one::<String>("locale").ok_or("missing locale")?;
    let section = matches.get_one::<String>("section").ok_or("missing section")?;
    let key = matches.get_one::<String>("key").ok_or("missing key")?;
    let args: Vec<&str> = matches
        .get_many::<String>("args")
        .map(|values| values.map(String::as_str).collect())
        .unwrap_or_default();
    let entity_names: Vec<String> = matches
        .get_many::<String>("entity")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let renames = matches
        .get_many::<String>("rename")
        .map(|values| values.map(|v| parse_rename(v)).collect::<Result<Vec<_>, _>>())
        .transpose()?
        .unwrap_or_default();

    let loader = LabelSetLoader::new(Arc::new(JsonDirSource::new(dir)?), "base", None);
    let localizer = LocalizerFactory::new(Arc::new(loader)).localizer(locale)?;
    debug!(locale = %locale, language = %localizer.language(), "localizer ready");

    let renamed = RenamedNouns::new();
    let dictionary = localizer.label_set().dictionary();
    let declension = localizer.language().declension();
    for rename in renames {
        let canonical = dictionary
            .get_noun(&rename.name, false)
            .ok_or_else(|| format!("no noun '{}' to rename", rename.name))?;
        let mut forms = HashMap::new();
        forms.insert(
            declension.noun_form(Number::Singular, Case::Nominative)?,
            rename.singular.clone(),
        );
        if let Some(plural) = &rename.plural {
            if declension.numbers().contains(&Number::Plural) {
                forms.insert(
                    declension.noun_form(Number::Plural, Case::Nominative)?,
                    plural.clone(),
                );
            }
        }
        let gender = rename.gender.unwrap_or(canonical.gender());
        let starts_with = rename
            .starts_with
            .unwrap_or_else(|| declension.infer_starts_with(&rename.singular));
        renamed.rename(dictionary, &rename.name, gender, starts_with, forms)?;
    }

    let localizer = localizer.with_renaming(&renamed);
    let entities: Vec<&dyn Renameable> = entity_names
        .iter()
        .map(|name| name as &dyn Renameable)
        .collect();

    let text = if matches.get_flag("strict") {
        localizer.get_label_throw(section, key, &entities, &args)?
    } else {
        localizer.get_label(section, key, &entities, &args)
    };
    println!("{}", text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rename_full() {
        assert_eq!(
            parse_rename("account=Client/Clients:m:c").unwrap(),
            RenameArg {
                name: "account".to_string(),
                singular: "Client".to_string(),
                plural: Some("Clients".to_string()),
                gender: Some(Gender::Masculine),
                starts_with: Some(StartsWith::Consonant),
            }
        );
    }

    #[test]
    fn test_parse_rename_singular_only() {
        let rename = parse_rename("case=Issue").unwrap();
        assert_eq!(rename.singular, "Issue");
        assert_eq!(rename.plural, None);
        assert_eq!(rename.gender, None);
    }

    #[test]
    fn test_parse_rename_rejects_garbage() {
        assert!(parse_rename("no-equals").is_err());
        assert!(parse_rename("=Client").is_err());
        assert!(parse_rename("account=Client:x").is_err());
    }
}

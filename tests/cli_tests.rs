//! Integration tests for CLI functionality

#[cfg(feature = "cli")]
mod cli_integration_tests {
    use std::fs;
    use std::path::Path;

    use clap::Parser;
    use tempfile::{NamedTempFile, TempDir};

    use bmpm::cli::commands::build_encoder;
    use bmpm::cli::{Cli, Commands};
    use bmpm::prelude::*;

    fn data_file(name: &str) -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
    }

    #[test]
    fn test_parse_encode_options() {
        let cli = Cli::try_parse_from([
            "bmpm", "encode", "Witz", "Schwarz", "-n", "ashkenazic", "-r", "exact", "-l",
            "german,english", "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Encode {
                names,
                name_type,
                rule_type,
                languages,
                json,
            } => {
                assert_eq!(names, ["Witz", "Schwarz"]);
                assert_eq!(name_type, NameType::Ashkenazic);
                assert_eq!(rule_type, RuleType::Exact);
                let expected: LanguageSet =
                    [Language::German, Language::English].into_iter().collect();
                assert_eq!(languages, Some(expected));
                assert!(json);
            }
            _ => panic!("expected encode"),
        }
        assert!(cli.config.is_none());
        assert!(cli.rules.is_none());
        assert!(cli.guess_policy.is_none());
    }

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["bmpm", "encode", "witz"]).unwrap();
        match cli.command {
            Commands::Encode {
                name_type,
                rule_type,
                languages,
                json,
                ..
            } => {
                assert_eq!(name_type, NameType::Generic);
                assert_eq!(rule_type, RuleType::Approx);
                assert_eq!(languages, None);
                assert!(!json);
            }
            _ => panic!("expected encode"),
        }
    }

    #[test]
    fn test_parse_short_name_types() {
        for (alias, expected) in [
            ("gen", NameType::Generic),
            ("ash", NameType::Ashkenazic),
            ("sep", NameType::Sephardic),
        ] {
            let cli = Cli::try_parse_from(["bmpm", "guess", "witz", "-n", alias]).unwrap();
            match cli.command {
                Commands::Guess { name_type, .. } => assert_eq!(name_type, expected),
                _ => panic!("expected guess"),
            }
        }
    }

    #[test]
    fn test_parse_global_options() {
        let cli = Cli::try_parse_from([
            "bmpm",
            "languages",
            "--guess-policy",
            "sequential",
            "--rules",
            "/tmp/rules",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.guess_policy, Some(GuessPolicy::Sequential));
        assert_eq!(cli.rules.as_deref(), Some(Path::new("/tmp/rules")));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Languages { name_type: None }));
    }

    #[test]
    fn test_parse_rejects_unknown_values() {
        assert!(Cli::try_parse_from(["bmpm", "encode", "witz", "-l", "klingon"]).is_err());
        assert!(Cli::try_parse_from(["bmpm", "encode", "witz", "-n", "basque"]).is_err());
        assert!(Cli::try_parse_from(["bmpm", "encode"]).is_err());
    }

    #[test]
    fn test_build_encoder_defaults() {
        let encoder = build_encoder(None, None, None).unwrap();
        assert_eq!(encoder.config(), &EncoderConfig::default());
        assert_eq!(encoder.rule_book().name_types(), NameType::ALL.to_vec());
    }

    #[test]
    fn test_build_encoder_policy_overrides_config_file() {
        let config = NamedTempFile::new().unwrap();
        fs::write(
            config.path(),
            r#"{"guess_policy": "union", "max_results": 2}"#,
        )
        .unwrap();

        let from_file = build_encoder(Some(config.path()), None, None).unwrap();
        assert_eq!(from_file.config().guess_policy, GuessPolicy::Union);
        let both: LanguageSet = [Language::English, Language::German].into_iter().collect();
        assert_eq!(
            from_file.guess_languages("witz", NameType::Generic).unwrap(),
            both
        );

        let encoder =
            build_encoder(Some(config.path()), None, Some(GuessPolicy::Sequential)).unwrap();
        assert_eq!(encoder.config().guess_policy, GuessPolicy::Sequential);
        assert_eq!(encoder.config().max_results, 2);
        assert_eq!(
            encoder.guess_languages("witz", NameType::Generic).unwrap(),
            LanguageSet::from(Language::German)
        );
    }

    #[test]
    fn test_build_encoder_bad_config_file() {
        let config = NamedTempFile::new().unwrap();
        fs::write(config.path(), r#"{"max_branch": 4}"#).unwrap();
        assert!(build_encoder(Some(config.path()), None, None).is_err());

        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.json");
        assert!(build_encoder(Some(missing.as_path()), None, None).is_err());
    }

    #[test]
    fn test_build_encoder_empty_rules_dir() {
        let dir = TempDir::new().unwrap();
        let err = build_encoder(None, Some(dir.path()), None).unwrap_err();
        assert!(err.to_string().contains("No rule files"), "{err}");
    }

    #[test]
    fn test_build_encoder_partial_rules_dir() {
        let dir = TempDir::new().unwrap();
        fs::copy(data_file("generic.json"), dir.path().join("generic.json")).unwrap();

        let encoder = build_encoder(None, Some(dir.path()), None).unwrap();
        assert_eq!(encoder.rule_book().name_types(), vec![NameType::Generic]);
        let keys = encoder
            .encode("Witz", NameType::Generic, RuleType::Approx, None)
            .unwrap();
        assert!(keys.contains(&"vits".to_string()), "{keys:?}");
        assert!(encoder
            .encode("Kohn", NameType::Ashkenazic, RuleType::Approx, None)
            .is_err());
    }

    #[test]
    fn test_build_encoder_malformed_rules_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("generic.json"), "{ not json").unwrap();
        assert!(build_encoder(None, Some(dir.path()), None).is_err());
    }
}

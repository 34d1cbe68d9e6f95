use crate::grammar::{
    AdjectiveForm, ArticleForm, ArticleKind, Case, Gender, NounForm, Number, StartsWith,
};
use crate::language::Language;

use super::{Declension, FormLookup};

const GENDERS: [Gender; 2] = [Gender::Masculine, Gender::Feminine];

fn singular_nominative(known: FormLookup<'_>) -> Option<String> {
    known(NounForm::new(Number::Singular, Case::Nominative))
}

/// French: singular and plural, masculine and feminine. The definite article
/// elides before a vowel ("l'").
#[derive(Debug, Default)]
pub struct FrenchDeclension;

impl FrenchDeclension {
    pub fn pluralize(singular: &str) -> String {
        if singular.ends_with(['s', 'x', 'z']) {
            singular.to_string()
        } else if singular.ends_with("au") || singular.ends_with("eu") {
            format!("{}x", singular)
        } else if let Some(stem) = singular.strip_suffix("al") {
            format!("{}aux", stem)
        } else {
            format!("{}s", singular)
        }
    }
}

impl Declension for FrenchDeclension {
    fn language(&self) -> Language {
        Language::French
    }

    fn genders(&self) -> &'static [Gender] {
        &GENDERS
    }

    fn has_starts_with(&self) -> bool {
        true
    }

    fn derive_noun(
        &self,
        form: NounForm,
        _gender: Gender,
        known: FormLookup<'_>,
    ) -> Option<String> {
        match form.number() {
            Number::Singular => None,
            Number::Plural => singular_nominative(known).map(|s| Self::pluralize(&s)),
        }
    }

    fn derive_adjective(&self, base: &str, form: AdjectiveForm) -> String {
        let gendered = if form.gender() == Gender::Feminine && !base.ends_with('e') {
            format!("{}e", base)
        } else {
            base.to_string()
        };
        match form.number() {
            Number::Singular => gendered,
            Number::Plural if form.gender() == Gender::Feminine => {
                if gendered.ends_with('s') {
                    gendered
                } else {
                    format!("{}s", gendered)
                }
            }
            Number::Plural => Self::pluralize(&gendered),
        }
    }

    fn default_article(&self, kind: ArticleKind, form: ArticleForm) -> Option<&'static str> {
        match (kind, form.number(), form.starts_with(), form.gender()) {
            (ArticleKind::Zero, _, _, _) => None,
            (ArticleKind::Indefinite, Number::Plural, _, _) => Some("des "),
            (ArticleKind::Indefinite, Number::Singular, _, Gender::Feminine) => Some("une "),
            (ArticleKind::Indefinite, Number::Singular, _, _) => Some("un "),
            (ArticleKind::Definite, Number::Plural, _, _) => Some("les "),
            (ArticleKind::Definite, Number::Singular, StartsWith::Vowel, _) => Some("l'"),
            (ArticleKind::Definite, Number::Singular, _, Gender::Feminine) => Some("la "),
            (ArticleKind::Definite, Number::Singular, _, _) => Some("le "),
        }
    }
}

/// Spanish: singular and plural, masculine and feminine, articles agree in
/// both.
#[derive(Debug, Default)]
pub struct SpanishDeclension;

impl SpanishDeclension {
    pub fn pluralize(singular: &str) -> String {
        if let Some(stem) = singular.strip_suffix('z') {
            format!("{}ces", stem)
        } else if singular.ends_with(['a', 'e', 'i', 'o', 'u', 'á', 'é', 'ó']) {
            format!("{}s", singular)
        } else if singular.ends_with('s') {
            singular.to_string()
        } else {
            format!("{}es", singular)
        }
    }
}

impl Declension for SpanishDeclension {
    fn language(&self) -> Language {
        Language::Spanish
    }

    fn genders(&self) -> &'static [Gender] {
        &GENDERS
    }

    fn derive_noun(
        &self,
        form: NounForm,
        _gender: Gender,
        known: FormLookup<'_>,
    ) -> Option<String> {
        match form.number() {
            Number::Singular => None,
            Number::Plural => singular_nominative(known).map(|s| Self::pluralize(&s)),
        }
    }

    fn derive_adjective(&self, base: &str, form: AdjectiveForm) -> String {
        let gendered = match (form.gender(), base.strip_suffix('o')) {
            (Gender::Feminine, Some(stem)) => format!("{}a", stem),
            _ => base.to_string(),
        };
        match form.number() {
            Number::Singular => gendered,
            Number::Plural => Self::pluralize(&gendered),
        }
    }

    fn default_article(&self, kind: ArticleKind, form: ArticleForm) -> Option<&'static str> {
        let feminine = form.gender() == Gender::Feminine;
        match (kind, form.number()) {
            (ArticleKind::Zero, _) => None,
            (ArticleKind::Indefinite, Number::Singular) => {
                Some(if feminine { "una " } else { "un " })
            }
            (ArticleKind::Indefinite, Number::Plural) => {
                Some(if feminine { "unas " } else { "unos " })
            }
            (ArticleKind::Definite, Number::Singular) => Some(if feminine { "la " } else { "el " }),
            (ArticleKind::Definite, Number::Plural) => Some(if feminine { "las " } else { "los " }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("compte", "comptes")]
    #[case("bureau", "bureaux")]
    #[case("journal", "journaux")]
    #[case("prix", "prix")]
    fn test_french_plural(#[case] singular: &str, #[case] plural: &str) {
        assert_eq!(FrenchDeclension::pluralize(singular), plural);
    }

    #[rstest]
    #[case("cuenta", "cuentas")]
    #[case("lápiz", "lápices")]
    #[case("usuario", "usuarios")]
    #[case("papel", "papeles")]
    fn test_spanish_plural(#[case] singular: &str, #[case] plural: &str) {
        assert_eq!(SpanishDeclension::pluralize(singular), plural);
    }

    #[test]
    fn test_french_elision() {
        let d = FrenchDeclension;
        let vowel = d.article_form(
            Gender::Masculine,
            Number::Singular,
            Case::Nominative,
            StartsWith::Vowel,
        );
        let consonant = d.article_form(
            Gender::Feminine,
            Number::Singular,
            Case::Nominative,
            StartsWith::Consonant,
        );
        assert_eq!(d.default_article(ArticleKind::Definite, vowel), Some("l'"));
        assert_eq!(d.default_article(ArticleKind::Definite, consonant), Some("la "));
        assert_eq!(d.default_article(ArticleKind::Indefinite, consonant), Some("une "));
    }

    #[test]
    fn test_neuter_falls_back_to_masculine() {
        let d = SpanishDeclension;
        let form = d.article_form(Gender::Neuter, Number::Plural, Case::Dative, StartsWith::Vowel);
        assert_eq!(form.gender(), Gender::Masculine);
        assert_eq!(form.case(), Case::Nominative);
        assert_eq!(d.default_article(ArticleKind::Definite, form), Some("los "));
    }

    #[test]
    fn test_adjective_agreement() {
        let es = SpanishDeclension;
        let fem_pl = es.adjective_form(
            Gender::Feminine,
            Number::Plural,
            Case::Nominative,
            ArticleKind::Definite,
            StartsWith::Consonant,
        );
        assert_eq!(es.derive_adjective("nuevo", fem_pl), "nuevas");

        let fr = FrenchDeclension;
        let fem = fr.adjective_form(
            Gender::Feminine,
            Number::Singular,
            Case::Nominative,
            ArticleKind::Indefinite,
            StartsWith::Consonant,
        );
        assert_eq!(fr.derive_adjective("grand", fem), "grande");
    }
}

//! The default public/private rule catalog.
//!
//! Rule order is significant: earlier rules claim area first. Category
//! lists hold attribute values exactly as they appear in BGT and TOP10NL.

use super::predicate::Predicate;
use super::rule::Rule;
use crate::feature::Category;
use crate::source::Dataset;

/// Attribute holding the feature identifier in both datasets.
pub const SOURCE_ID_ATTRIBUTE: &str = "lokaal_id";

/// TOP10NL functional areas that are not publicly accessible.
pub const PRIVATE_FUNCTIONAL_AREAS: &[&str] = &[
    "attractiepark",
    "botanische tuin",
    "bungalowpark",
    "camping, kampeerterrein",
    "caravanpark",
    "circuit",
    "crossbaan",
    "dierentuin, safaripark",
    "eendenkooi",
    "emplacement",
    "gaswinning",
    "gebied voor radioastronomie",
    "golfterrein",
    "grindwinning",
    "groeve",
    "heemtuin",
    "helikopterlandingsterrein",
    "infiltratiegebied",
    "jachthaven",
    "kartingbaan",
    "kazerne, legerplaats",
    "mijn",
    "milieustraat",
    // The reference list joins these two as "militair oefengebied,
    // schietterrein mosselbank", which matches no TOP10NL value. Both real
    // values are listed here, so rule 1 claims these areas as private.
    "militair oefengebied, schietterrein",
    "mosselbank",
    "oliewinning",
    "openluchtmuseum",
    "openluchttheater",
    "productie-installatie",
    "renbaan",
    "skibaan",
    "slipschool",
    "sportterrein, sportcomplex",
    "stortplaats",
    "tennispark",
    "transformatorstation",
    "tuincentrum",
    "vakantiepark",
    "viskwekerij",
    "visvijvercomplex",
    "vliegveld, luchthaven",
    "ijsbaan",
    "zandwinning",
    "zenderpark",
    "ziekenhuiscomplex",
    "zonnepark",
    "zoutwinning",
    "zuiveringsinstallatie",
    "zweefvliegveldterrein",
    "zwembadcomplex",
];

/// TOP10NL functional areas for harbours.
pub const HARBOUR_FUNCTIONAL_AREAS: &[&str] = &["haven"];

/// BGT vegetation types that count as public green.
pub const PUBLIC_VEGETATION: &[&str] = &[
    "gemengd bos",
    "grasland overig",
    "groenvoorziening",
    "heide",
    "houtwal",
    "loofbos",
    "naaldbos",
    "rietland",
    "struiken",
];

/// BGT engineering works that are publicly accessible.
pub const PUBLIC_ENGINEERING_WORKS: &[&str] = &["perron"];

const PRIVATE: &str = "privaat";
const PUBLIC: &str = "publiek";

/// The seventeen rules of the public/private classification, in order.
pub fn default_rules() -> Vec<Rule> {
    vec![
        // 1
        Rule::new(
            Dataset::Top10nl,
            "functioneelgebied",
            Category::Private,
            format!(
                "TOP10NL functioneel gebied van niet-openbare categorie, zie kolom 'source_category'. Geclassificeerd als {PRIVATE}"
            ),
        )
        .with_predicate(Predicate::is_in("typefunctioneelgebied", PRIVATE_FUNCTIONAL_AREAS))
        .with_source_category("typefunctioneelgebied"),
        // 2
        Rule::new(
            Dataset::Bgt,
            "pand",
            Category::Private,
            format!("BGT pand geclassificeerd als {PRIVATE}"),
        ),
        // 3
        Rule::new(
            Dataset::Bgt,
            "onbegroeidterreindeel",
            Category::Private,
            format!("BGT onbegroeid terreindeel van categorie 'erf' geclassificeerd als {PRIVATE}"),
        )
        .with_predicate(Predicate::equals("fysiek_voorkomen", "erf"))
        .with_output_layer("onbegroeid_terreindeel")
        .with_source_category("fysiek_voorkomen"),
        // 4
        Rule::new(
            Dataset::Bgt,
            "begroeidterreindeel",
            Category::Public,
            format!(
                "BGT begroeidterreindeel fysiek voorkomen van openbare categorie, zie kolom 'source_category'. Geclassificeerd als {PUBLIC}"
            ),
        )
        .with_predicate(Predicate::is_in("fysiek_voorkomen", PUBLIC_VEGETATION))
        .with_output_layer("begroeid_terreindeel")
        .with_source_category("fysiek_voorkomen"),
        // 5
        Rule::new(
            Dataset::Bgt,
            "begroeidterreindeel",
            Category::Private,
            format!(
                "BGT begroeidterreindeel fysiek voorkomen van niet-openbare categorie, zie kolom 'source_category'. Geclassificeerd als {PRIVATE}"
            ),
        )
        .with_predicate(Predicate::not_in("fysiek_voorkomen", PUBLIC_VEGETATION))
        .with_output_layer("begroeid_terreindeel")
        .with_source_category("fysiek_voorkomen"),
        // 6
        Rule::new(
            Dataset::Bgt,
            "wegdeel",
            Category::Private,
            format!("BGT wegdeel van categorie 'spoorbaan' geclassificeerd als {PRIVATE}"),
        )
        .with_predicate(Predicate::equals("functie", "spoorbaan"))
        .with_source_category("functie"),
        // 7
        Rule::new(
            Dataset::Bgt,
            "wegdeel",
            Category::Public,
            format!("BGT wegdeel (geen spoorbaan) geclassificeerd als {PUBLIC}"),
        )
        .with_predicate(Predicate::not_equals("functie", "spoorbaan"))
        .with_source_category("functie"),
        // 8
        Rule::new(
            Dataset::Bgt,
            "waterdeel",
            Category::Public,
            format!("BGT waterdeel geclassificeerd als {PUBLIC}"),
        )
        .with_source_category("type"),
        // 9
        Rule::new(
            Dataset::Bgt,
            "ondersteunend_waterdeel",
            Category::Public,
            format!("BGT ondersteunend waterdeel geclassificeerd als {PUBLIC}"),
        )
        .with_source_category("type"),
        // 10
        Rule::new(
            Dataset::Bgt,
            "ondersteunend_wegdeel",
            Category::Public,
            format!("BGT ondersteunend wegdeel geclassificeerd als {PUBLIC}"),
        )
        .with_source_category("fysiek_voorkomen"),
        // 11
        Rule::new(
            Dataset::Bgt,
            "scheiding",
            Category::Private,
            format!("BGT scheiding geclassificeerd als {PRIVATE}"),
        )
        .with_source_category("type"),
        // 12
        Rule::new(
            Dataset::Bgt,
            "overigbouwwerk",
            Category::Private,
            format!("BGT overig bouwwerk geclassificeerd als {PRIVATE}"),
        )
        .with_source_category("type"),
        // 13
        Rule::new(
            Dataset::Top10nl,
            "functioneelgebied",
            Category::Private,
            format!("TOP10NL functioneel gebied van categorie 'haven', geclassificeerd als {PRIVATE}"),
        )
        .with_predicate(Predicate::is_in("typefunctioneelgebied", HARBOUR_FUNCTIONAL_AREAS))
        .with_source_category("typefunctioneelgebied"),
        // 14
        Rule::new(
            Dataset::Bgt,
            "onbegroeidterreindeel",
            Category::Public,
            format!(
                "BGT onbegroeidterreindeel fysiek voorkomen van openbare categorie, zie kolom 'source_category'. Geclassificeerd als {PUBLIC}"
            ),
        )
        .with_predicate(Predicate::not_equals("fysiek_voorkomen", "erf"))
        .with_output_layer("onbegroeid_terreindeel")
        .with_source_category("fysiek_voorkomen"),
        // 15
        Rule::new(
            Dataset::Bgt,
            "kunstwerkdeel",
            Category::Public,
            format!(
                "BGT kunstwerkdeel type van openbare categorie, zie kolom 'source_category'. Geclassificeerd als {PUBLIC}"
            ),
        )
        .with_predicate(Predicate::is_in("type", PUBLIC_ENGINEERING_WORKS))
        .with_source_category("type"),
        // 16
        Rule::new(
            Dataset::Bgt,
            "kunstwerkdeel",
            Category::Private,
            format!(
                "BGT kunstwerkdeel type van niet-openbare categorie, zie kolom 'source_category'. Geclassificeerd als {PRIVATE}"
            ),
        )
        .with_predicate(Predicate::not_in("type", PUBLIC_ENGINEERING_WORKS))
        .with_source_category("type"),
        // 17
        Rule::new(
            Dataset::Bgt,
            "overbruggingsdeel",
            Category::Private,
            format!("BGT overbruggingsdeel geclassificeerd als {PRIVATE}"),
        )
        .with_source_category("type_overbruggingsdeel"),
    ]
}

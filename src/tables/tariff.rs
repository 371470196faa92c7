use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{DEFAULT_REGION, deserialize_region_map, region_key};
use crate::directory::{
    LookupError, RegionDirectory, TariffDirectory, TariffQuote, TariffSpecificity,
};

/// `(locality, distributor, price)` override inside a region.
type LocalityRow = (&'static str, &'static str, f64);

/// `(region, default distributor, default price, locality overrides)`.
type RegionRow = (&'static str, &'static str, f64, &'static [LocalityRow]);

const LIGHT: &str = "Light";
const ENEL_RJ: &str = "Enel RJ";
const CEEE: &str = "CEEE Equatorial";
const ENEL_SP: &str = "Enel SP";
const EDP_SP: &str = "EDP SP";
const CPFL_PIRATININGA: &str = "CPFL Piratininga";
const ELEKTRO: &str = "Elektro";
const ENERGISA_MR: &str = "Energisa Minas-Rio";

/// Residential (B1) average tariffs with taxes, 2025 estimates.
const BUILTIN_TARIFFS: &[RegionRow] = &[
    ("AC", "Energisa Acre", 1.02, &[]),
    ("AL", "Equatorial Alagoas", 0.98, &[]),
    ("AM", "Amazonas Energia", 1.05, &[]),
    ("AP", "Equatorial Amapá", 0.92, &[]),
    ("BA", "Neoenergia Coelba", 0.99, &[]),
    ("CE", "Enel Ceará", 0.97, &[]),
    ("DF", "Neoenergia Brasília", 0.85, &[]),
    (
        "ES",
        "EDP Espírito Santo",
        0.91,
        &[("Santa Teresa", "Santa Maria (ELFSM)", 0.89)],
    ),
    ("GO", "Equatorial Goiás", 0.89, &[("Chevreul", "Chesp", 0.91)]),
    ("MA", "Equatorial Maranhão", 1.05, &[]),
    (
        "MG",
        "CEMIG",
        0.98,
        &[
            ("Poços de Caldas", "DMED", 0.92),
            ("Cataguases", ENERGISA_MR, 1.01),
            ("Leopoldina", ENERGISA_MR, 1.01),
            ("Muriaé", ENERGISA_MR, 1.01),
            ("Manhuaçu", ENERGISA_MR, 1.01),
            ("Ubá", ENERGISA_MR, 1.01),
            ("São João Nepomuceno", ENERGISA_MR, 1.01),
        ],
    ),
    ("MS", "Energisa MS", 1.01, &[]),
    ("MT", "Energisa MT", 0.96, &[]),
    ("PA", "Equatorial Pará", 1.15, &[]),
    (
        "PB",
        "Energisa Paraíba",
        0.93,
        &[
            ("João Pessoa", "Energisa Borborema", 0.94),
            ("Campina Grande", "Energisa Borborema", 0.94),
        ],
    ),
    ("PE", "Neoenergia Pernambuco", 0.96, &[]),
    ("PI", "Equatorial Piauí", 1.02, &[]),
    ("PR", "Copel", 0.86, &[]),
    (
        "RJ",
        ENEL_RJ,
        1.12,
        &[
            ("Rio de Janeiro", LIGHT, 1.25),
            ("Nova Iguaçu", LIGHT, 1.25),
            ("Belford Roxo", LIGHT, 1.25),
            ("São João de Meriti", LIGHT, 1.25),
            ("Duque de Caxias", LIGHT, 1.25),
            ("Mesquita", LIGHT, 1.25),
            ("Nilópolis", LIGHT, 1.25),
            ("Queimados", LIGHT, 1.25),
            ("Paracambi", LIGHT, 1.25),
            ("Seropédica", LIGHT, 1.25),
            ("Itaguaí", LIGHT, 1.25),
            ("Barra do Piraí", LIGHT, 1.25),
            ("Piraí", LIGHT, 1.25),
            ("Rio Claro", LIGHT, 1.25),
            ("Volta Redonda", LIGHT, 1.25),
            ("Barra Mansa", LIGHT, 1.25),
            ("Valença", LIGHT, 1.25),
            ("Vassouras", LIGHT, 1.25),
            ("Três Rios", LIGHT, 1.25),
            ("Nova Friburgo", "Energisa Nova Friburgo", 1.08),
            ("Niterói", ENEL_RJ, 1.12),
            ("São Gonçalo", ENEL_RJ, 1.12),
            ("Maricá", ENEL_RJ, 1.12),
            ("Cabo Frio", ENEL_RJ, 1.12),
            ("Macaé", ENEL_RJ, 1.12),
        ],
    ),
    ("RN", "Neoenergia Cosern", 0.95, &[]),
    ("RO", "Energisa Rondônia", 0.92, &[]),
    ("RR", "Roraima Energia", 0.90, &[]),
    (
        "RS",
        "RGE Sul",
        0.94,
        &[
            ("Porto Alegre", CEEE, 0.89),
            ("Pelotas", CEEE, 0.89),
            ("Viamão", CEEE, 0.89),
            ("Alvorada", CEEE, 0.89),
            ("Rio Grande", CEEE, 0.89),
            ("Bagé", CEEE, 0.89),
            ("Camaquã", CEEE, 0.89),
            ("Guaíba", CEEE, 0.89),
            ("Osório", CEEE, 0.89),
            ("Tramandaí", CEEE, 0.89),
            ("Ijuí", "Demei", 0.92),
        ],
    ),
    (
        "SC",
        "Celesc",
        0.82,
        &[
            ("Jaraguá do Sul", "Celesc", 0.82),
            ("Urussanga", "EFLUL", 0.81),
            ("Içara", "Cooperaliança", 0.79),
        ],
    ),
    ("SE", "Energisa Sergipe", 0.96, &[("Estância", "Sulgipe", 0.98)]),
    (
        "SP",
        "CPFL Paulista",
        0.96,
        &[
            ("São Paulo", ENEL_SP, 0.90),
            ("Osasco", ENEL_SP, 0.90),
            ("Santo André", ENEL_SP, 0.90),
            ("São Bernardo do Campo", ENEL_SP, 0.90),
            ("São Caetano do Sul", ENEL_SP, 0.90),
            ("Diadema", ENEL_SP, 0.90),
            ("Cotia", ENEL_SP, 0.90),
            ("Barueri", ENEL_SP, 0.90),
            ("Guarulhos", EDP_SP, 0.95),
            ("Mogi das Cruzes", EDP_SP, 0.95),
            ("São José dos Campos", EDP_SP, 0.95),
            ("Taubaté", EDP_SP, 0.95),
            ("Santos", CPFL_PIRATININGA, 0.97),
            ("Sorocaba", CPFL_PIRATININGA, 0.97),
            ("Jundiaí", CPFL_PIRATININGA, 0.97),
            ("Indaiatuba", CPFL_PIRATININGA, 0.97),
            ("Vinhedo", CPFL_PIRATININGA, 0.97),
            ("Campinas", "CPFL Paulista", 0.96),
            ("Limeira", ELEKTRO, 0.94),
            ("Rio Claro", ELEKTRO, 0.94),
            ("Campos do Jordão", ELEKTRO, 0.94),
            ("Presidente Prudente", "Energisa SP", 1.02),
            ("Bragança Paulista", "Energisa Sul-Sudeste", 1.03),
        ],
    ),
    ("TO", "Energisa Tocantins", 1.04, &[]),
];

/// Distributor and price for one tariff entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Tariff {
    pub distributor: String,
    pub price_per_kwh: f64,
}

impl Tariff {
    fn new(distributor: &str, price_per_kwh: f64) -> Self {
        Self {
            distributor: distributor.to_string(),
            price_per_kwh,
        }
    }
}

/// Region default plus locality-specific overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionTariffs {
    pub default: Tariff,
    #[serde(default)]
    pub localities: BTreeMap<String, Tariff>,
}

/// Static tariff directory keyed by region code and locality name.
///
/// Unknown regions resolve to the fallback entry (region `PADRAO`) rather than
/// failing, so a price is always available for the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TariffTable {
    pub fallback: Tariff,
    #[serde(deserialize_with = "deserialize_region_map")]
    pub regions: BTreeMap<String, RegionTariffs>,
}

impl Default for TariffTable {
    fn default() -> Self {
        let regions = BUILTIN_TARIFFS
            .iter()
            .map(|&(code, distributor, price, localities)| {
                let localities = localities
                    .iter()
                    .map(|&(name, distributor, price)| {
                        (name.to_string(), Tariff::new(distributor, price))
                    })
                    .collect();
                (
                    code.to_string(),
                    RegionTariffs {
                        default: Tariff::new(distributor, price),
                        localities,
                    },
                )
            })
            .collect();
        Self {
            fallback: Tariff::new("Local distributor", 0.90),
            regions,
        }
    }
}

impl TariffTable {
    /// Resolves a tariff, never failing: unknown regions use the fallback entry
    /// and unknown localities use their region's default.
    pub fn resolve(&self, region: &str, locality: Option<&str>) -> TariffQuote {
        let key = region_key(region);
        let Some(region_tariffs) = self.regions.get(&key) else {
            tracing::debug!(region = %key, "region not in tariff table, using {DEFAULT_REGION}");
            return quote(&key, locality, &self.fallback, TariffSpecificity::RegionDefault);
        };

        match locality.and_then(|name| region_tariffs.localities.get(name.trim())) {
            Some(tariff) => quote(&key, locality, tariff, TariffSpecificity::Locality),
            None => quote(
                &key,
                locality,
                &region_tariffs.default,
                TariffSpecificity::RegionDefault,
            ),
        }
    }
}

fn quote(
    region: &str,
    locality: Option<&str>,
    tariff: &Tariff,
    specificity: TariffSpecificity,
) -> TariffQuote {
    TariffQuote {
        region: region.to_string(),
        locality: locality.map(|name| name.trim().to_string()),
        distributor: tariff.distributor.clone(),
        price_per_kwh: tariff.price_per_kwh,
        specificity,
    }
}

impl TariffDirectory for TariffTable {
    fn tariff(&self, region: &str, locality: Option<&str>) -> Result<TariffQuote, LookupError> {
        Ok(self.resolve(region, locality))
    }
}

impl RegionDirectory for TariffTable {
    /// Only localities with their own tariff entry are known to the static table.
    /// Unknown regions get the fallback entry's list, which is empty, mirroring
    /// [`TariffTable::resolve`].
    fn localities(&self, region: &str) -> Result<Vec<String>, LookupError> {
        let key = region_key(region);
        match self.regions.get(&key) {
            Some(r) => Ok(r.localities.keys().cloned().collect()),
            None => {
                tracing::debug!(region = %key, "region not in tariff table, using {DEFAULT_REGION}");
                Ok(Vec::new())
            }
        }
    }
}

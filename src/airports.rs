//! IATA airport whitelist, excluded common words and display names

use std::collections::HashSet;
use std::sync::LazyLock;

/// IATA codes accepted as airports.
static IATA_CODES: &[&str] = &[
    // United States
    "ABE", "ABI", "ABQ", "ACK", "ACT", "ACV", "AEX", "AGS", "ALB", "AMA", "ANC", "APF", "ASE",
    "ATL", "ATW", "AUS", "AVL", "AVP", "AZA", "AZO", "BDL", "BET", "BFL", "BGM", "BGR", "BHM",
    "BIL", "BIS", "BLI", "BMI", "BNA", "BOI", "BOS", "BQK", "BRO", "BTR", "BTV", "BUF", "BUR",
    "BWI", "BZN", "CAE", "CAK", "CHA", "CHO", "CHS", "CID", "CLE", "CLL", "CLT", "CMH", "CMI",
    "COS", "CRP", "CRW", "CUS", "CVG", "CWA", "DAB", "DAL", "DAY", "DCA", "DEN", "DFW", "DLH",
    "DRO", "DSM", "DTW", "EGE", "ELP", "EUG", "EVV", "EWN", "EWR", "EYW", "FAI", "FAR", "FAT",
    "FAY", "FCA", "FLG", "FLL", "FNT", "FSD", "FSM", "FWA", "GEG", "GFK", "GJT", "GNV", "GPT",
    "GRB", "GRR", "GSO", "GSP", "GTF", "GUM", "HDN", "HHH", "HNL", "HOU", "HPN", "HRL", "HSV",
    "HYA", "IAD", "IAH", "ICT", "IDA", "ILM", "IND", "ISP", "ITO", "JAC", "JAN", "JAX", "JFK",
    "JNU", "KOA", "KTN", "LAN", "LAS", "LAX", "LBB", "LCH", "LEX", "LFT", "LGA", "LGB", "LIH",
    "LIT", "LNK", "LRD", "MAF", "MBS", "MCI", "MCO", "MDT", "MDW", "MEM", "MER", "MFE", "MFR",
    "MGM", "MHT", "MIA", "MKE", "MLB", "MLI", "MLU", "MOB", "MRY", "MSN", "MSO", "MSP", "MSY",
    "MTJ", "MVY", "MYR", "OAJ", "OAK", "OGG", "OKC", "OMA", "ONT", "ORD", "ORF", "ORH", "OTZ",
    "PAE", "PBI", "PDX", "PHF", "PHL", "PHX", "PIA", "PIE", "PIT", "PNS", "PSC", "PSP", "PVD",
    "PWM", "RAP", "RDM", "RDU", "RIC", "RNO", "ROA", "ROC", "RST", "RSW", "SAN", "SAT", "SAV",
    "SBA", "SBN", "SBP", "SCE", "SDF", "SEA", "SFB", "SFO", "SGF", "SHV", "SJC", "SJU", "SLC",
    "SMF", "SNA", "SPI", "SRQ", "STL", "STT", "STX", "SUX", "SWF", "SYR", "TLH", "TPA", "TRI",
    "TTN", "TUL", "TUS", "TVC", "TYS", "VPS", "XNA", "YUM",
    // Canada
    "YEG", "YHZ", "YLW", "YOW", "YQB", "YQR", "YUL", "YVR", "YWG", "YXE", "YYC", "YYJ", "YYT",
    "YYZ",
    // Mexico, Central America and Caribbean
    "ANU", "AUA", "BDA", "BGI", "BZE", "CUN", "CZM", "GCM", "GDL", "GUA", "LIR", "MBJ", "MEX",
    "MTY", "NAS", "PLS", "POP", "PTY", "PUJ", "PVR", "SAL", "SDQ", "SJD", "SJO", "SXM", "TGU",
    "UVF",
    // South America
    "BOG", "CCS", "CTG", "EZE", "GIG", "GRU", "GYE", "LIM", "MDE", "MVD", "SCL", "UIO",
    // Europe
    "AGP", "ALC", "AMS", "ARN", "ATH", "BCN", "BER", "BFS", "BHX", "BLQ", "BRU", "BUD", "CDG",
    "CGN", "CPH", "DUB", "DUS", "EDI", "FCO", "FRA", "GLA", "GVA", "HAM", "HEL", "IBZ", "IST",
    "KEF", "KRK", "LGW", "LHR", "LIN", "LIS", "LTN", "LYS", "MAD", "MAN", "MRS", "MUC", "MXP",
    "NAP", "NCE", "ORY", "OPO", "OSL", "PMI", "PRG", "SNN", "STN", "STR", "SVQ", "TXL", "VCE",
    "VIE", "WAW", "ZRH",
    // Middle East and Africa
    "ADD", "AMM", "AUH", "BAH", "CAI", "CMN", "CPT", "DOH", "DXB", "JED", "JNB", "KWI", "LOS",
    "MCT", "NBO", "RUH", "TLV",
    // Asia
    "BKK", "BLR", "BOM", "CAN", "CGK", "CMB", "CTS", "DEL", "DPS", "FUK", "HAN", "HKG", "HKT",
    "HND", "ICN", "KIX", "KUL", "MAA", "MNL", "NGO", "NRT", "PEK", "PKX", "PVG", "SGN", "SIN",
    "SZX", "TPE",
    // Oceania and Pacific
    "ADL", "AKL", "BNE", "CHC", "CNS", "MEL", "NAN", "OOL", "PER", "PPT", "SYD", "WLG",
    // Codes that collide with common words; present so the exclusion list can veto them
    "ADD", "BAN", "CAP", "CAT", "CIA", "DOT", "GAP", "HIT", "LET", "LOG", "OWN", "PAD", "PAL",
    "PAT", "PEC", "RUN", "SLP", "TAB", "TAP", "TON", "TOP", "USE", "WAY", "WEB",
];

/// Three-letter words that appear in email text but must never be read as airports.
static EXCLUDED_CODES: &[&str] = &[
    // Common words
    "THE", "AND", "FOR", "ARE", "BUT", "NOT", "YOU", "ALL", "CAN", "HAD", "HER", "WAS", "ONE",
    "OUR", "OUT", "DAY", "GET", "HAS", "HIM", "HIS", "HOW", "ITS", "MAY", "NEW", "NOW", "OLD",
    "SEE", "WAY", "WHO", "BOY", "DID", "SAY", "SHE", "TOO", "USE", "AIR", "FLY", "RUN", "TRY",
    "CAR", "END", "PRE", "PRO", "VIA", "PER", "NET", "WEB", "APP", "API", "URL", "USA", "CRO",
    "CSS", "PHP", "SQL", "XML", "PDF", "JPG", "PNG", "GIF", "ADD", "AGO", "ANY", "ASK", "BAD",
    "BAG", "BIG", "BIT", "BOX", "BUS", "BUY", "CUT", "DOC", "DUE", "EAT", "FAR", "FAX", "FEW",
    "FIT", "FUN", "GOT", "GUN", "GUY", "HOT", "JOB", "KEY", "KID", "LAW", "LAY", "LED", "LET",
    "LIE", "LOG", "LOT", "LOW", "MAN", "MAP", "MEN", "MET", "MIX", "MOM", "NOR", "ODD", "OFF",
    "OIL", "PAY", "PEN", "PET", "PIN", "POP", "POT", "PUT", "RAW", "RED", "REF", "RID", "ROW",
    "SAT", "SET", "SIT", "SIX", "SKY", "SON", "SUM", "SUN", "TAX", "TEN", "TIP", "TOP", "TOY",
    "TWO", "VAN", "WAR", "WET", "WIN", "WON", "YES", "YET", "ZIP",
    // Domains
    "COM", "ORG", "EDU", "GOV", "MIL", "BIZ",
    // Weekdays and months
    "MON", "TUE", "WED", "THU", "FRI", "JAN", "FEB", "MAR", "APR", "JUN", "JUL", "AUG", "SEP",
    "OCT", "NOV", "DEC",
    // Known false positives
    "NON", "APY", "CIA", "AAA", "BBB", "CCC", "DDD", "EEE", "FFF", "GGG", "HHH", "III", "JJJ",
    "KKK", "LLL", "MMM", "NNN", "OOO", "PPP", "QQQ", "RRR", "SSS", "TTT", "UUU", "VVV", "WWW",
    "XXX", "YYY", "ZZZ", "PEC", "HIT", "GAP", "TAB", "DOT", "CAT", "TAP", "TON", "BAN", "RAP",
    "SLP", "CUS", "MER", "LOS", "OWN", "CAP", "PAL", "PAT", "PAD",
];

/// Short display names for common airports.
static AIRPORT_NAMES: &[(&str, &str)] = &[
    ("ATL", "Atlanta"),
    ("AUS", "Austin"),
    ("BNA", "Nashville"),
    ("BOS", "Boston"),
    ("BWI", "Baltimore"),
    ("CLT", "Charlotte"),
    ("DCA", "Washington Reagan"),
    ("DEN", "Denver"),
    ("DFW", "Dallas-Fort Worth"),
    ("DTW", "Detroit"),
    ("EWR", "Newark"),
    ("FLL", "Fort Lauderdale"),
    ("HNL", "Honolulu"),
    ("IAD", "Washington Dulles"),
    ("IAH", "Houston"),
    ("JFK", "New York JFK"),
    ("LAS", "Las Vegas"),
    ("LAX", "Los Angeles"),
    ("LGA", "New York LaGuardia"),
    ("MCO", "Orlando"),
    ("MDW", "Chicago Midway"),
    ("MIA", "Miami"),
    ("MSP", "Minneapolis"),
    ("MSY", "New Orleans"),
    ("MVY", "Martha's Vineyard"),
    ("ORD", "Chicago O'Hare"),
    ("PDX", "Portland"),
    ("PHL", "Philadelphia"),
    ("PHX", "Phoenix"),
    ("PVD", "Providence"),
    ("RDU", "Raleigh-Durham"),
    ("SAN", "San Diego"),
    ("SAV", "Savannah"),
    ("SEA", "Seattle"),
    ("SFO", "San Francisco"),
    ("SJU", "San Juan"),
    ("SLC", "Salt Lake City"),
    ("TPA", "Tampa"),
    ("YUL", "Montreal"),
    ("YVR", "Vancouver"),
    ("YYZ", "Toronto"),
    ("CUN", "Cancun"),
    ("MEX", "Mexico City"),
    ("AMS", "Amsterdam"),
    ("CDG", "Paris"),
    ("DUB", "Dublin"),
    ("FCO", "Rome"),
    ("FRA", "Frankfurt"),
    ("LGW", "London Gatwick"),
    ("LHR", "London Heathrow"),
    ("LIS", "Lisbon"),
    ("MAD", "Madrid"),
    ("DXB", "Dubai"),
    ("DOH", "Doha"),
    ("HKG", "Hong Kong"),
    ("HND", "Tokyo Haneda"),
    ("NRT", "Tokyo Narita"),
    ("ICN", "Seoul"),
    ("SIN", "Singapore"),
    ("SYD", "Sydney"),
];

static EXCLUDED: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| EXCLUDED_CODES.iter().copied().collect());

static VALID: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    IATA_CODES
        .iter()
        .copied()
        .filter(|code| !EXCLUDED.contains(code))
        .collect()
});

/// Check if a code is a usable airport code (whitelisted and not a common word)
#[must_use]
pub fn is_valid_airport(code: &str) -> bool {
    VALID.contains(code)
}

/// Every whitelisted code, including ones vetoed by the exclusion list
#[must_use]
pub fn iata_codes() -> &'static [&'static str] {
    IATA_CODES
}

/// The common-word exclusion list
#[must_use]
pub fn excluded_codes() -> &'static [&'static str] {
    EXCLUDED_CODES
}

/// Display string such as `"JFK (New York JFK)"`, or the bare code when unnamed
#[must_use]
pub fn airport_display(code: &str) -> String {
    AIRPORT_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map_or_else(|| code.to_string(), |(c, name)| format!("{c} ({name})"))
}

//! # Standard Catalogs
//!
//! The baseline competence and document-type catalogs an Italian vendor
//! register starts from. Codes follow the conventions of the paper
//! register they replace (DURC, visure, patentini); deployments extend or
//! deactivate entries through fixtures rather than editing this list.

use albo_core::{CompetenceDomain, DocumentDomain};

use crate::catalog::{CompetenceDef, DocumentTypeDef};

/// Number of competences in the standard catalog.
pub const STANDARD_COMPETENCES: usize = 28;

/// Number of document types in the standard catalog.
pub const STANDARD_DOCUMENT_TYPES: usize = 22;

/// The standard competence catalog.
///
/// Only RSPP is mandatory across the board; everything else is demanded
/// per category through applicability or checked as optional evidence.
/// Renewal periods are in months and follow the underlying norms
/// (quinquennial for most safety roles, triennial for first-aid and
/// fire-safety refreshers).
pub fn standard_competences() -> Vec<CompetenceDef> {
    use CompetenceDomain::*;
    vec![
        // safety
        CompetenceDef::new("RSPP", "Responsabile del Servizio di Prevenzione e Protezione", Safety)
            .mandatory()
            .with_certification()
            .with_renewal(60),
        CompetenceDef::new("ASPP", "Addetto al Servizio di Prevenzione e Protezione", Safety)
            .with_certification()
            .with_renewal(60),
        CompetenceDef::new("RLS", "Rappresentante dei Lavoratori per la Sicurezza", Safety)
            .with_renewal(12),
        CompetenceDef::new("ADD_ANTINC", "Addetto Antincendio", Safety)
            .with_certification()
            .with_renewal(36),
        CompetenceDef::new("ADD_PRIMO_SOCC", "Addetto al Primo Soccorso", Safety)
            .with_certification()
            .with_renewal(36),
        CompetenceDef::new("PREPOSTO", "Preposto alla Sicurezza", Safety).with_renewal(24),
        CompetenceDef::new("LAV_QUOTA", "Abilitazione Lavori in Quota", Safety)
            .with_certification()
            .with_renewal(60),
        CompetenceDef::new("SPAZI_CONF", "Abilitazione Spazi Confinati", Safety)
            .with_certification()
            .with_renewal(60),
        CompetenceDef::new("PES_PAV", "Qualifica PES/PAV CEI 11-27", Safety)
            .with_certification()
            .with_renewal(60),
        CompetenceDef::new("COORD_SIC", "Coordinatore della Sicurezza CSP/CSE", Safety)
            .with_certification()
            .with_renewal(60),
        // technical
        CompetenceDef::new("PATENT_GRU", "Patentino Gruista", Technical)
            .with_certification()
            .with_renewal(60),
        CompetenceDef::new("PATENT_MULET", "Patentino Carrellista", Technical)
            .with_certification()
            .with_renewal(60),
        CompetenceDef::new("PATENT_PLE", "Abilitazione Piattaforme di Lavoro Elevabili", Technical)
            .with_certification()
            .with_renewal(60),
        CompetenceDef::new("SALD_CERT", "Saldatore Certificato UNI EN ISO 9606", Technical)
            .with_certification()
            .with_renewal(36),
        CompetenceDef::new("IMP_ELETTR", "Installatore Impianti Elettrici DM 37/08", Technical)
            .with_certification(),
        CompetenceDef::new("IMP_TERMO", "Installatore Impianti Termoidraulici DM 37/08", Technical)
            .with_certification(),
        CompetenceDef::new("FRIGORISTA", "Patentino Frigorista F-GAS", Technical)
            .with_certification()
            .with_renewal(120),
        CompetenceDef::new("COND_CALDAIE", "Conduttore Caldaie di Secondo Grado", Technical)
            .with_certification(),
        // energy
        CompetenceDef::new("EGE", "Esperto in Gestione dell'Energia UNI CEI 11339", Energy)
            .with_certification()
            .with_renewal(60),
        CompetenceDef::new("AUDITOR_ENERG", "Auditor Energetico", Energy)
            .with_certification()
            .with_renewal(36),
        CompetenceDef::new("CERTIF_APE", "Certificatore Energetico APE", Energy)
            .with_certification()
            .with_renewal(12),
        CompetenceDef::new("FER", "Installatore Fonti di Energia Rinnovabile", Energy)
            .with_certification()
            .with_renewal(36),
        // quality
        CompetenceDef::new("RESP_QUALITA", "Responsabile Sistema Qualità", Quality),
        CompetenceDef::new("ISP_COLLAUDO", "Ispettore di Collaudo", Quality)
            .with_certification()
            .with_renewal(36),
        CompetenceDef::new("METROLOGO", "Tecnico Metrologo", Quality)
            .with_certification()
            .with_renewal(60),
        // audit
        CompetenceDef::new("AUD_SGQ", "Auditor Sistemi di Gestione Qualità ISO 9001", Audit)
            .with_certification()
            .with_renewal(36),
        CompetenceDef::new("AUD_SGA", "Auditor Sistemi di Gestione Ambientale ISO 14001", Audit)
            .with_certification()
            .with_renewal(36),
        CompetenceDef::new("AUD_SGS_PIR", "Auditor Sistemi di Gestione Sicurezza ISO 45001", Audit)
            .with_certification()
            .with_renewal(36),
    ]
}

/// The standard document-type catalog.
///
/// Validity and alert windows are in days. The two constitutive acts
/// never expire, so their alert window is zero; everything renewable
/// alerts between 30 and 90 days ahead depending on how slow the issuing
/// body is.
pub fn standard_document_types() -> Vec<DocumentTypeDef> {
    use DocumentDomain::*;
    vec![
        // legal standing
        DocumentTypeDef::new("DURC", "Documento Unico di Regolarità Contributiva", Legal)
            .mandatory()
            .with_validity(120, 30),
        DocumentTypeDef::new("VISURA_CAM", "Visura Camerale", Legal)
            .mandatory()
            .with_validity(180, 30),
        DocumentTypeDef::new("CERT_PREF", "Comunicazione Antimafia Prefettizia", Legal)
            .mandatory()
            .with_validity(180, 45),
        DocumentTypeDef::new("CASELLARIO", "Certificato del Casellario Giudiziale", Legal)
            .with_validity(180, 30),
        DocumentTypeDef::new("STAT_SOC", "Statuto Societario", Legal)
            .mandatory()
            .with_alert(0),
        DocumentTypeDef::new("ATTO_COST", "Atto Costitutivo", Legal)
            .mandatory()
            .with_alert(0),
        // financial standing
        DocumentTypeDef::new("BILAN_ULT", "Bilancio Ultimo Esercizio", Financial)
            .mandatory()
            .with_validity(365, 60),
        DocumentTypeDef::new("CERT_BANC", "Referenze Bancarie", Financial).with_validity(180, 30),
        // insurance cover
        DocumentTypeDef::new("RC_PROF", "Polizza RC Professionale", Insurance)
            .mandatory()
            .with_validity(365, 60),
        DocumentTypeDef::new("RC_OPER", "Polizza RC Operativa", Insurance)
            .mandatory()
            .with_validity(365, 60),
        DocumentTypeDef::new("INF_INAIL", "Posizione Assicurativa INAIL", Insurance)
            .mandatory()
            .with_validity(365, 45),
        // safety paperwork
        DocumentTypeDef::new("DVR", "Documento di Valutazione dei Rischi", Safety)
            .mandatory()
            .with_validity(365, 60),
        DocumentTypeDef::new("DUVRI", "DUVRI", Safety).with_validity(365, 60),
        DocumentTypeDef::new("POS", "Piano Operativo di Sicurezza", Safety).with_validity(365, 45),
        DocumentTypeDef::new("FORM_LAVORAT", "Attestati Formazione Lavoratori", Safety)
            .mandatory()
            .with_validity(1825, 90),
        // management-system certifications
        DocumentTypeDef::new("ISO_9001", "Certificazione ISO 9001", Certification)
            .with_validity(1095, 90),
        DocumentTypeDef::new("ISO_14001", "Certificazione ISO 14001", Certification)
            .with_validity(1095, 90),
        DocumentTypeDef::new("ISO_45001", "Certificazione ISO 45001", Certification)
            .with_validity(1095, 90),
        DocumentTypeDef::new("ISO_50001", "Certificazione ISO 50001", Certification)
            .with_validity(1095, 90),
        // technical capability
        DocumentTypeDef::new("REF_TECN", "Referenze Tecniche e Lavori Analoghi", Technical)
            .with_validity(730, 60),
        DocumentTypeDef::new("ORG_TECN", "Organigramma Tecnico", Technical).with_validity(365, 60),
        DocumentTypeDef::new("ATTREZZA", "Elenco Attrezzature e Mezzi", Technical)
            .with_validity(365, 60),
    ]
}

// Data models for the residence roster

use crate::record::{EntitySchema, FieldValue, Record};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Staff member of the residence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Personnel {
    pub id: String,
    pub nom: String,
    pub prenom: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telephone: Option<String>,
    #[serde(default)]
    pub poste: Option<String>,
    #[serde(default)]
    pub departement: Option<String>,
    #[serde(default)]
    pub date_embauche: Option<NaiveDate>,
    #[serde(default)]
    pub date_fin_contrat: Option<NaiveDate>,
}

pub static PERSONNEL_SCHEMA: EntitySchema = EntitySchema {
    kind: "personnel",
    search_fields: &["nom", "prenom", "id", "email", "poste", "departement"],
    fields: &[
        "id",
        "nom",
        "prenom",
        "email",
        "telephone",
        "poste",
        "departement",
        "date_embauche",
        "date_fin_contrat",
    ],
    full_name: Some(("prenom", "nom")),
    category_field: "departement",
    start_date_field: "date_embauche",
    end_date_field: "date_fin_contrat",
    assignment_field: None,
    date_fields: &["date_embauche", "date_fin_contrat"],
    track_duration: false,
};

impl Record for Personnel {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.as_str().into()),
            "nom" => Some(self.nom.as_str().into()),
            "prenom" => Some(self.prenom.as_str().into()),
            "email" => self.email.clone().map(FieldValue::Text),
            "telephone" => self.telephone.clone().map(FieldValue::Text),
            "poste" => self.poste.clone().map(FieldValue::Text),
            "departement" => self.departement.clone().map(FieldValue::Text),
            "date_embauche" => self.date_embauche.map(FieldValue::Date),
            "date_fin_contrat" => self.date_fin_contrat.map(FieldValue::Date),
            _ => None,
        }
    }

    fn schema() -> &'static EntitySchema {
        &PERSONNEL_SCHEMA
    }
}

/// Room reference held by an intern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chambre {
    pub id: String,
    pub numero: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paye,
    NonPaye,
    Exonere,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Paye => "paye",
            PaymentStatus::NonPaye => "non_paye",
            PaymentStatus::Exonere => "exonere",
        }
    }
}

/// Intern ("stagiaire") housed by the residence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stagiaire {
    pub id: String,
    pub nom: String,
    pub prenom: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telephone: Option<String>,
    #[serde(default)]
    pub etablissement: Option<String>,
    #[serde(default)]
    pub type_stagiaire: Option<String>,
    #[serde(default)]
    pub date_debut: Option<NaiveDate>,
    #[serde(default)]
    pub date_fin: Option<NaiveDate>,
    #[serde(default)]
    pub chambre: Option<Chambre>,
    #[serde(default)]
    pub paiement: Option<PaymentStatus>,
    #[serde(default)]
    pub trimestre_1: bool,
    #[serde(default)]
    pub trimestre_2: bool,
    #[serde(default)]
    pub trimestre_3: bool,
}

pub static STAGIAIRE_SCHEMA: EntitySchema = EntitySchema {
    kind: "stagiaires",
    search_fields: &[
        "nom",
        "prenom",
        "id",
        "email",
        "etablissement",
        "type_stagiaire",
        "chambre",
    ],
    fields: &[
        "id",
        "nom",
        "prenom",
        "email",
        "telephone",
        "etablissement",
        "type_stagiaire",
        "date_debut",
        "date_fin",
        "chambre",
        "paiement",
        "trimestre_1",
        "trimestre_2",
        "trimestre_3",
    ],
    full_name: Some(("prenom", "nom")),
    category_field: "type_stagiaire",
    start_date_field: "date_debut",
    end_date_field: "date_fin",
    assignment_field: Some("chambre"),
    date_fields: &["date_debut", "date_fin"],
    track_duration: true,
};

impl Record for Stagiaire {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.as_str().into()),
            "nom" => Some(self.nom.as_str().into()),
            "prenom" => Some(self.prenom.as_str().into()),
            "email" => self.email.clone().map(FieldValue::Text),
            "telephone" => self.telephone.clone().map(FieldValue::Text),
            "etablissement" => self.etablissement.clone().map(FieldValue::Text),
            "type_stagiaire" => self.type_stagiaire.clone().map(FieldValue::Text),
            "date_debut" => self.date_debut.map(FieldValue::Date),
            "date_fin" => self.date_fin.map(FieldValue::Date),
            "chambre" => self
                .chambre
                .as_ref()
                .map(|c| FieldValue::Text(c.numero.clone())),
            "paiement" => self.paiement.map(|p| p.as_str().into()),
            "trimestre_1" => Some(FieldValue::Bool(self.trimestre_1)),
            "trimestre_2" => Some(FieldValue::Bool(self.trimestre_2)),
            "trimestre_3" => Some(FieldValue::Bool(self.trimestre_3)),
            _ => None,
        }
    }

    fn schema() -> &'static EntitySchema {
        &STAGIAIRE_SCHEMA
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_status_serialization() {
        let json = serde_json::to_string(&PaymentStatus::NonPaye).unwrap();
        assert_eq!(json, "\"non_paye\"");

        let status: PaymentStatus = serde_json::from_str("\"exonere\"").unwrap();
        assert_eq!(status, PaymentStatus::Exonere);
    }

    #[test]
    fn test_stagiaire_optional_fields_default() {
        let json = r#"{"id":"s1","nom":"Diallo","prenom":"Awa"}"#;
        let s: Stagiaire = serde_json::from_str(json).unwrap();

        assert_eq!(s.field("email"), None);
        assert_eq!(s.field("chambre"), None);
        assert_eq!(s.field("trimestre_2"), Some(FieldValue::Bool(false)));
        assert_eq!(s.text("date_debut"), "");
    }

    #[test]
    fn test_stagiaire_room_reads_as_number() {
        let json = r#"{"id":"s1","nom":"Diallo","prenom":"Awa",
            "chambre":{"id":"c7","numero":"B-12"},"paiement":"paye",
            "date_debut":"2024-09-01","date_fin":"2025-06-30"}"#;
        let s: Stagiaire = serde_json::from_str(json).unwrap();

        assert_eq!(s.text("chambre"), "B-12");
        assert_eq!(s.text("paiement"), "paye");
        assert_eq!(s.date("date_fin"), NaiveDate::from_ymd_opt(2025, 6, 30));
    }

    #[test]
    fn test_personnel_schema_roles() {
        let schema = Personnel::schema();
        assert_eq!(schema.category_field, "departement");
        assert!(schema.assignment_field.is_none());
        assert!(!schema.track_duration);
        assert!(Stagiaire::schema().track_duration);
    }

    #[test]
    fn test_declared_fields_are_readable() {
        let json = r#"{"id":"s1","nom":"Diallo","prenom":"Awa","email":"a@x.sn",
            "telephone":"0612345678","etablissement":"UCAD","type_stagiaire":"interne",
            "chambre":{"id":"c7","numero":"007"},"paiement":"non_paye",
            "date_debut":"2024-09-01","date_fin":"2025-06-30"}"#;
        let s: Stagiaire = serde_json::from_str(json).unwrap();
        for name in Stagiaire::schema().fields {
            assert!(s.field(name).is_some(), "{} not readable", name);
        }
        assert_eq!(s.field("type"), None);
        assert!(!Stagiaire::schema().has_field("type"));
    }
}

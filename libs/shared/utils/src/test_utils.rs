use std::sync::Arc;

use serde_json::{json, Value};

use shared_config::AppConfig;

pub const DOCTORS_PATH: &str = "/campus-api-mock/doctors.json";

pub struct TestConfig {
    pub doctors_api_url: String,
    pub port: u16,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            doctors_api_url: format!("http://localhost:54321{}", DOCTORS_PATH),
            port: 0,
        }
    }
}

impl TestConfig {
    /// Config whose doctor source lives on a mock server at `base_url`.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            doctors_api_url: format!("{}{}", base_url, DOCTORS_PATH),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            doctors_api_url: self.doctors_api_url.clone(),
            port: self.port,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct MockDirectoryResponses;

impl MockDirectoryResponses {
    pub fn doctor_record(
        id: Option<&str>,
        name: &str,
        specialties: &[&str],
        fees: &str,
        experience: u32,
        video_consult: bool,
        in_clinic: bool,
    ) -> Value {
        let mut record = json!({
            "name": name,
            "speciality": specialties,
            "fees": fees,
            "experience": experience,
            "videoConsult": video_consult,
            "inClinic": in_clinic,
        });
        if let Some(id) = id {
            record["id"] = json!(id);
        }
        record
    }

    /// Five doctors covering every filter dimension. The last two have no id
    /// and are served as `doc-4` and `doc-5`.
    pub fn directory() -> Value {
        let mut asha = Self::doctor_record(Some("101"), "Dr. Asha Rao", &["Dentist"], "₹ 500", 10, true, true);
        asha["location"] = json!("Bangalore");
        asha["qualification"] = json!("BDS, MDS");
        asha["rating"] = json!(4.6);
        asha["reviews"] = json!([
            { "patientName": "Nikhil", "rating": 5, "comment": "Gentle and quick." },
            { "patientName": "Priya", "rating": 4.4 }
        ]);

        let kabir = Self::doctor_record(
            Some("102"), "Dr. Kabir Das", &["Dermatologist", "Cosmetologist"], "₹ 800", 4, true, false,
        );

        let mut meera = Self::doctor_record(
            Some("103"), "Dr. Meera Iyer", &["General Physician"], "₹ 500", 15, false, true,
        );
        meera["availability"] = json!(false);

        let mut ravi = Self::doctor_record(
            None, "Dr. Ravi Kumar", &["Dentist", "General Physician"], "₹ 1,200", 10, false, true,
        );
        ravi["location"] = json!("Chennai");

        let sunita = Self::doctor_record(None, "Dr. Sunita Menon", &["Homeopath"], "₹ 300", 22, true, false);

        json!([asha, kabir, meera, ravi, sunita])
    }

    pub fn error_response(message: &str) -> Value {
        json!({
            "error": {
                "message": message
            }
        })
    }
}

use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use front_desk_core::config::DB_PATH_ENV;
use front_desk_core::models::{GENDER_OPTIONS, LAB_TEST_MENU, UnknownFrequency};
use front_desk_core::{
    DeskConfig, Doctor, HospitalService, LabOrder, LabTest, Medication, NewPatient,
    NewPrescription, Patient, Prescription,
};

#[derive(Parser)]
#[command(name = "front-desk")]
#[command(about = "Hospital front desk: registration, consultation queue, lab and pharmacy")]
struct Cli {
    /// SQLite database file (falls back to FRONT_DESK_DB, then front_desk.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a patient and add them to today's queue
    Register {
        first_name: String,
        last_name: String,
        /// Male, Female or Other
        gender: String,
        phone: String,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        emergency_contact: Option<String>,
        #[arg(long)]
        history: Option<String>,
    },
    /// Put a returning patient back in the queue
    Requeue { patient_id: String },
    /// Look up a patient by phone number
    FindPhone { phone: String },
    /// List all patients, newest first
    Patients,
    /// Show the consultation queue
    Waiting,
    /// Call the next patient in to the doctor
    CallNext,
    /// Close a consultation with no lab work or prescription
    CompleteConsultation { patient_id: String },
    /// Delete a patient record
    DeletePatient { patient_id: String },
    /// List doctors
    Doctors,
    /// Order a lab test for the patient with the doctor
    OrderLab {
        patient_id: String,
        /// One of the lab menu entries (see `lab-menu`)
        test_type: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Ordering doctor (defaults to the attending doctor)
        #[arg(long)]
        doctor: Option<String>,
    },
    /// Show the lab test menu
    LabMenu,
    /// List lab tests that are ordered or in progress
    PendingLabs,
    /// Mark a lab test as in progress
    StartLab { test_id: String },
    /// Save results without completing the test
    SaveResults { test_id: String, results: String },
    /// Record results and complete the test
    CompleteLab { test_id: String, results: String },
    /// Print a lab result report
    LabReport {
        test_id: String,
        #[arg(long)]
        json: bool,
    },
    /// Write a prescription for the patient with the doctor
    Prescribe {
        patient_id: String,
        diagnosis: String,
        /// NAME:DOSAGE:FREQUENCY:DAYS[:INSTRUCTIONS], repeatable
        #[arg(long = "medication", short = 'm', required = true)]
        medications: Vec<String>,
        #[arg(long, default_value = "")]
        instructions: String,
        /// Prescribing doctor (defaults to the attending doctor)
        #[arg(long)]
        doctor: Option<String>,
    },
    /// List prescriptions awaiting the pharmacy
    PendingPrescriptions,
    /// Dispense a prescription
    Dispense { prescription_id: String },
    /// Print medication labels for a prescription
    Labels {
        prescription_id: String,
        #[arg(long)]
        json: bool,
    },
    /// Run a full visit against an in-memory store
    Demo,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("front_desk=info".parse()?)
                .add_directive("front_desk_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Commands::Demo = cli.command {
        return run_demo();
    }

    let config = DeskConfig::resolve_sqlite(cli.db, std::env::var(DB_PATH_ENV).ok());
    let mut service = HospitalService::from_config(&config).with_context(|| {
        format!(
            "failed to open front desk database at {}",
            config.db_path().map(|p| p.display().to_string()).unwrap_or_default()
        )
    })?;

    run(&mut service, cli.command)
}

fn run(service: &mut HospitalService, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Register {
            first_name,
            last_name,
            gender,
            phone,
            dob,
            email,
            address,
            emergency_contact,
            history,
        } => {
            let mut new_patient = NewPatient::new(first_name, last_name, gender, phone);
            if !new_patient.has_listed_gender() {
                tracing::warn!(
                    gender = %new_patient.gender,
                    options = ?GENDER_OPTIONS,
                    "gender is not one of the registration options"
                );
            }
            if let Some(dob) = dob {
                let date = NaiveDate::parse_from_str(&dob, "%Y-%m-%d")
                    .with_context(|| format!("invalid date of birth: {}", dob))?;
                new_patient = new_patient.with_date_of_birth(date);
            }
            new_patient.email = email;
            new_patient.address = address;
            new_patient.emergency_contact = emergency_contact;
            new_patient.medical_history = history;

            let patient = service.register_patient(new_patient)?;
            println!(
                "Registered {} as {}, queue number {}",
                patient.full_name(),
                patient.patient_id,
                patient.queue_number
            );
        }
        Commands::Requeue { patient_id } => {
            let patient = service.requeue_patient(&patient_id)?;
            println!("{} is back in the queue at {}", patient.patient_id, patient.queue_number);
        }
        Commands::FindPhone { phone } => match service.find_patient_by_phone(&phone)? {
            Some(patient) => print_patient(&patient),
            None => println!("No patient registered with phone {}", phone),
        },
        Commands::Patients => {
            let patients = service.all_patients()?;
            if patients.is_empty() {
                println!("No patients found.");
            }
            for patient in &patients {
                print_patient(patient);
            }
        }
        Commands::Waiting => {
            let waiting = service.waiting_patients()?;
            if waiting.is_empty() {
                println!("Nobody is waiting.");
            }
            for patient in &waiting {
                println!(
                    "#{:<3} {}  {}  (registered {})",
                    patient.queue_number,
                    patient.patient_id,
                    patient.full_name(),
                    patient.registered_at.format("%H:%M")
                );
            }
        }
        Commands::CallNext => match service.call_next_patient()? {
            Some(patient) => println!(
                "Now seeing {} {} (queue #{})",
                patient.patient_id,
                patient.full_name(),
                patient.queue_number
            ),
            None => println!("Nobody is waiting."),
        },
        Commands::CompleteConsultation { patient_id } => {
            service.complete_consultation(&patient_id)?;
            println!("Consultation for {} completed", patient_id);
        }
        Commands::DeletePatient { patient_id } => {
            if service.delete_patient(&patient_id)? {
                println!("Deleted {}", patient_id);
            } else {
                println!("No patient {}", patient_id);
            }
        }
        Commands::Doctors => {
            for doctor in service.all_doctors()? {
                print_doctor(&doctor);
            }
        }
        Commands::OrderLab {
            patient_id,
            test_type,
            description,
            doctor,
        } => {
            if !LAB_TEST_MENU.contains(&test_type.as_str()) {
                tracing::warn!(%test_type, "test type is not on the lab menu");
            }
            let mut order = LabOrder::new(patient_id, test_type);
            order.description = description;
            order.ordered_by = doctor;
            let test = service.order_lab_test(order)?;
            println!("Lab test ordered: {}", test.test_id);
        }
        Commands::LabMenu => {
            for test_type in LAB_TEST_MENU {
                println!("{}", test_type);
            }
        }
        Commands::PendingLabs => {
            let tests = service.pending_lab_tests()?;
            if tests.is_empty() {
                println!("No pending lab tests.");
            }
            for test in &tests {
                print_lab_test(test);
            }
        }
        Commands::StartLab { test_id } => {
            let test = service.start_lab_test(&test_id)?;
            print_lab_test(&test);
        }
        Commands::SaveResults { test_id, results } => {
            let test = service.save_lab_results(&test_id, &results)?;
            print_lab_test(&test);
        }
        Commands::CompleteLab { test_id, results } => {
            let test = service.complete_lab_test(&test_id, &results)?;
            print_lab_test(&test);
        }
        Commands::LabReport { test_id, json } => {
            let report = service.lab_report(&test_id)?;
            if json {
                println!("{}", report.to_json()?);
            } else {
                print!("{}", report.to_text());
            }
        }
        Commands::Prescribe {
            patient_id,
            diagnosis,
            medications,
            instructions,
            doctor,
        } => {
            let mut new_prescription = NewPrescription::new(patient_id, diagnosis);
            for spec in &medications {
                new_prescription = new_prescription.with_medication(parse_medication(spec)?);
            }
            new_prescription.instructions = instructions;
            new_prescription.doctor_id = doctor;

            let prescription = service.create_prescription(new_prescription)?;
            println!("Prescription created: {}", prescription.prescription_id);
        }
        Commands::PendingPrescriptions => {
            let prescriptions = service.pending_prescriptions()?;
            if prescriptions.is_empty() {
                println!("No prescriptions awaiting the pharmacy.");
            }
            for prescription in &prescriptions {
                print_prescription(prescription);
            }
        }
        Commands::Dispense { prescription_id } => {
            let prescription = service.dispense_prescription(&prescription_id)?;
            println!(
                "Dispensed {} for {}",
                prescription.prescription_id, prescription.patient_id
            );
        }
        Commands::Labels {
            prescription_id,
            json,
        } => {
            let labels = service.medication_labels(&prescription_id)?;
            if json {
                println!("{}", labels.to_json()?);
            } else {
                print!("{}", labels.to_text());
            }
        }
        Commands::Demo => run_demo()?,
    }

    Ok(())
}

/// Parse `NAME:DOSAGE:FREQUENCY:DAYS[:INSTRUCTIONS]`.
fn parse_medication(spec: &str) -> anyhow::Result<Medication> {
    let parts: Vec<&str> = spec.splitn(5, ':').map(str::trim).collect();
    if parts.len() < 4 {
        bail!(
            "medication must look like NAME:DOSAGE:FREQUENCY:DAYS[:INSTRUCTIONS], got {:?}",
            spec
        );
    }

    let frequency = parts[2]
        .parse()
        .map_err(|e: UnknownFrequency| anyhow::anyhow!(e))?;
    let duration_days = parts[3]
        .parse()
        .with_context(|| format!("invalid duration in days: {}", parts[3]))?;

    Ok(Medication {
        name: parts[0].to_string(),
        dosage: parts[1].to_string(),
        frequency,
        duration_days,
        instructions: parts.get(4).copied().unwrap_or_default().to_string(),
    })
}

fn run_demo() -> anyhow::Result<()> {
    let mut service = HospitalService::in_memory()?;

    let jane = service.register_patient(
        NewPatient::new("Jane", "Doe", "Female", "555-0100")
            .with_date_of_birth(NaiveDate::from_ymd_opt(1985, 3, 2).context("bad demo date")?),
    )?;
    let john = service.register_patient(NewPatient::new("John", "Roe", "Male", "555-0101"))?;
    println!(
        "Registered {} (#{}) and {} (#{})",
        jane.patient_id, jane.queue_number, john.patient_id, john.queue_number
    );

    if let Some(patient) = service.call_next_patient()? {
        println!("Now seeing {}", patient.full_name());
    }

    let test = service.order_lab_test(LabOrder::new(&jane.patient_id, LAB_TEST_MENU[0]))?;
    service.start_lab_test(&test.test_id)?;
    service.complete_lab_test(&test.test_id, "Hemoglobin 13.5 g/dL, WBC 6.2")?;
    print!("{}", service.lab_report(&test.test_id)?.to_text());

    service.call_next_patient()?;
    service.call_next_patient()?;
    let prescription = service.create_prescription(
        NewPrescription::new(&jane.patient_id, "Iron deficiency")
            .with_medication(parse_medication("Ferrous sulfate:325mg:Once daily:30:Take with orange juice")?),
    )?;
    service.complete_consultation(&john.patient_id)?;
    service.dispense_prescription(&prescription.prescription_id)?;
    print!("{}", service.medication_labels(&prescription.prescription_id)?.to_text());

    let today = Local::now().date_naive();
    for patient in service.all_patients()? {
        let age = patient
            .age_on(today)
            .map(|a| a.to_string())
            .unwrap_or_else(|| "-".into());
        println!("{} {} age {} {}", patient.patient_id, patient.full_name(), age, patient.status);
    }

    Ok(())
}

fn print_patient(patient: &Patient) {
    println!(
        "{}  {}  {}  {}  queue #{}  {}",
        patient.patient_id,
        patient.full_name(),
        patient.gender,
        patient.phone_number,
        patient.queue_number,
        patient.status
    );
}

fn print_doctor(doctor: &Doctor) {
    println!("{}  {}", doctor.doctor_id, doctor);
}

fn print_lab_test(test: &LabTest) {
    println!(
        "{}  {}  {}  {}  ordered {}",
        test.test_id,
        test.patient_id,
        test.test_type,
        test.status,
        test.ordered_at.format("%m/%d/%Y %H:%M")
    );
}

fn print_prescription(prescription: &Prescription) {
    println!(
        "{}  {}  {}  {}",
        prescription.prescription_id,
        prescription.patient_id,
        prescription.diagnosis,
        prescription.status
    );
    for medication in &prescription.medications {
        println!("    {}", medication);
    }
}

use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use roster_core::service::EmployeeService;
use roster_core::store::EmployeeStore;
use std::path::Path;

#[derive(Subcommand, Debug)]
pub enum EmployeeSubcommand {
    /// List stored employees
    List,
    /// Show one employee with skills
    Show { id: u64 },
    /// Delete an employee
    Delete { id: u64 },
}

pub fn run(root: &Path, subcommand: EmployeeSubcommand, json: bool) -> anyhow::Result<()> {
    let store = EmployeeStore::new(root);
    match subcommand {
        EmployeeSubcommand::List => list(&store, json),
        EmployeeSubcommand::Show { id } => show(&store, id, json),
        EmployeeSubcommand::Delete { id } => delete(&store, id, json),
    }
}

fn list(store: &EmployeeStore, json: bool) -> anyhow::Result<()> {
    let employees = store.list_employees().context("failed to read employees")?;
    if json {
        return print_json(&employees);
    }
    if employees.is_empty() {
        println!("No employees.");
        return Ok(());
    }
    let rows = employees
        .iter()
        .map(|e| {
            vec![
                e.id.map(|id| id.to_string()).unwrap_or_default(),
                e.full_name.clone(),
                e.email.clone(),
                e.contact_preference.to_string(),
                e.skills.len().to_string(),
            ]
        })
        .collect();
    print_table(&["ID", "NAME", "EMAIL", "CONTACT", "SKILLS"], rows);
    Ok(())
}

fn show(store: &EmployeeStore, id: u64, json: bool) -> anyhow::Result<()> {
    let employee = store.get_employee(id)?;
    if json {
        return print_json(&employee);
    }
    println!("Employee {id}: {}", employee.full_name);
    println!("Email:     {}", employee.email);
    println!("Phone:     {}", employee.phone.as_deref().unwrap_or("-"));
    println!("Contact:   {}", employee.contact_preference);
    if employee.skills.is_empty() {
        println!("\nNo skills.");
    } else {
        println!();
        let rows = employee
            .skills
            .iter()
            .map(|s| {
                vec![
                    s.skill_name.clone(),
                    s.experience_in_years.clone(),
                    s.proficiency.to_string(),
                ]
            })
            .collect();
        print_table(&["SKILL", "YEARS", "PROFICIENCY"], rows);
    }
    Ok(())
}

fn delete(store: &EmployeeStore, id: u64, json: bool) -> anyhow::Result<()> {
    store.delete_employee(id)?;
    if json {
        return print_json(&serde_json::json!({ "deleted": id }));
    }
    println!("Deleted employee {id}.");
    Ok(())
}

use sipcodec::spec;
use std::collections::HashMap;
use std::fs;
use yaml_rust::YamlLoader;

/// How often idle read loops wake to look for shutdown signals,
/// in seconds.
pub const SHUTDOWN_POLL_INTERVAL: u64 = 3;

/// One terminal login, keyed by its SIP username.
#[derive(Debug, Clone)]
pub struct Account {
    id: String,
    password: String,
    institution: String,
    print_width: Option<usize>,
    location: Option<String>,
}

impl Account {
    pub fn new(id: &str, password: &str, institution: &str) -> Account {
        Account {
            id: id.to_string(),
            password: password.to_string(),
            institution: institution.to_string(),
            print_width: None,
            location: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn password(&self) -> &str {
        &self.password
    }
    pub fn institution(&self) -> &str {
        &self.institution
    }
    pub fn print_width(&self) -> Option<usize> {
        self.print_width
    }
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn set_print_width(&mut self, width: usize) {
        self.print_width = Some(width);
    }
    pub fn set_location(&mut self, location: &str) {
        self.location = Some(location.to_string());
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub sip_address: String,
    pub sip_port: u16,
    pub max_clients: usize,
    pub ascii: bool,

    /// Variable-field delimiter.
    ///
    /// Per-server, never per-account: login happens before an
    /// account is selected.
    pub delimiter: char,

    /// Idle seconds before a connection is dropped; zero disables.
    ///
    /// Also advertised in the ACS Status response.
    pub timeout: u32,

    /// Retries-allowed value advertised in the ACS Status response.
    pub retries: u32,

    /// Whether the ACS renewal policy bit of the ACS Status response
    /// is set.
    pub renewal: bool,

    /// Institution served by the demo backend when no account is
    /// active yet.
    pub institution: String,

    pub accounts: HashMap<String, Account>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Config {
        Config {
            sip_address: String::from("localhost"),
            sip_port: 6001,
            max_clients: 256,
            ascii: true,
            delimiter: spec::DEFAULT_FIELD_DELIMITER,
            timeout: 0,
            retries: 0,
            renewal: true,
            institution: String::from("main"),
            accounts: HashMap::new(),
        }
    }

    /// Parse a YAML configuration file.
    pub fn read_yaml(&mut self, filename: &str) -> Result<(), String> {
        let yaml_text = fs::read_to_string(filename)
            .map_err(|e| format!("Cannot read configuration file {filename}: {e}"))?;

        let yaml_docs = YamlLoader::load_from_str(&yaml_text)
            .map_err(|e| format!("Cannot parse configuration file {filename}: {e}"))?;

        let root = match yaml_docs.first() {
            Some(r) => r,
            None => return Err(format!("Configuration file {filename} is empty")),
        };

        if let Some(v) = root["sip-address"].as_str() {
            self.sip_address = String::from(v);
        }

        if let Some(v) = root["sip-port"].as_i64() {
            self.sip_port = v as u16;
        }

        if let Some(v) = root["max-clients"].as_i64() {
            self.max_clients = v as usize;
        }

        if let Some(v) = root["ascii"].as_bool() {
            self.ascii = v;
        }

        if let Some(v) = root["delimiter"].as_str() {
            match v.chars().next() {
                Some(c) if v.len() == c.len_utf8() => self.delimiter = c,
                _ => return Err(format!("Invalid delimiter: '{v}'")),
            }
        }

        if let Some(v) = root["timeout"].as_i64() {
            self.timeout = v as u32;
        }

        if let Some(v) = root["retries"].as_i64() {
            self.retries = v as u32;
        }

        if let Some(v) = root["renewal"].as_bool() {
            self.renewal = v;
        }

        if let Some(v) = root["institution"].as_str() {
            self.institution = String::from(v);
        }

        for entry in root["accounts"].as_vec().unwrap_or(&Vec::new()) {
            let id = match entry["id"].as_str() {
                Some(id) => id,
                None => return Err("Account entry has no 'id' value".to_string()),
            };

            let password = match entry["password"].as_str() {
                Some(p) => p,
                None => return Err(format!("Account '{id}' has no 'password' value")),
            };

            let institution = entry["institution"].as_str().unwrap_or(&self.institution);

            let mut account = Account::new(id, password, institution);

            if let Some(w) = entry["print-width"].as_i64() {
                account.set_print_width(w as usize);
            }

            if let Some(l) = entry["location"].as_str() {
                account.set_location(l);
            }

            self.add_account(account);
        }

        Ok(())
    }

    pub fn add_account(&mut self, account: Account) {
        self.accounts.insert(account.id().to_string(), account);
    }

    pub fn get_account(&self, username: &str) -> Option<&Account> {
        self.accounts.get(username)
    }
}

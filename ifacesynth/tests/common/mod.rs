// Go sources shared by the integration tests

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

pub const PERSON: &str = r#"package main

// Person contains data related to a person.
type Person struct {
	name string
	age int
	telephone string
}

// Name ...
func (p *Person) Name() string {
	return p.name
}

// SetName ...
func (p *Person) SetName(name string) {
	p.name = name
}

// Age ...
func (p *Person) Age() int {
	return p.age
}

// Age ...
func (p *Person) SetAge(age int) int {
	p.age = age
	return p.age
}

// AgeAndName ...
func (p *Person) AgeAndName() (int, string) {
	return p.age, p.name
}

func (p *Person) SetAgeAndName(name string, age int) {
	p.name = name
	p.age = age
}

// TelephoneAndName ...
func (p *Person) GetNameAndTelephone() (name, telephone string) {
	telephone = p.telephone
	name = p.name
	return
}

func (p *Person) SetNameAndTelephone(name, telephone string) {
	p.name = name
	p.telephone = telephone
}

func SomeFunction() string {
	return "Something"
}
"#;

pub const TEST_IMPL: &str = r#"package maker

import (
	"github.com/vburenin/ifacemaker/maker/footest"
)

type TestImpl struct{}

func (s *TestImpl) GetUser(userID string) *footest.User {
	return &footest.User{}
}

func (s *TestImpl) CreateUser(user *footest.User) (*footest.User, error) {
	return &footest.User{}, nil
}

func (s *TestImpl) fooHelper() string {
	return ""
}"#;

pub const TEST_IMPL_EXTENDED: &str = r#"package maker
import (
	"github.com/vburenin/ifacemaker/maker/footest"
)

func (s *TestImpl) UpdateUser(userID string) *footest.User {
    return &footest.User{}, nil
}
"#;

pub const SMITER: &str = r#"package footest

// Hammer is in the same package but in a different file.
type Smiter struct {
	options Options
}
func (s *Smiter) Smite(weapon Hammer) error {
	return nil
}
"#;

pub const HEALER: &str = r#"package bartest

import (
	"github.com/test/footest"
)

type Healer struct {
	options Options
}
func (h *Healer) Heal(smiter *footest.Smiter) error {
	return nil
}
func (h *Healer) Buff(smiter *footest.Smiter, buffs []*footest.BuffType) error {
	return nil
}
"#;

pub const CUSTOM_STRUCTS: &str = r#"package bazztest
// ParentStruct ...
type ParentStruct struct {}

// DoSomething does something
func (ps *ParentStruct) DoSomething() error {
	return nil
}

// ChildStruct ...
type ChildStruct struct {
	ParentStruct
}
"#;

pub const PERSON_IFACE: &str = "// DO NOT EDIT: Auto generated

package gen

// PersonIface is an interface for Person.
// Person contains data related to a person.
type PersonIface interface {
	// Name ...
	Name() string
	// SetName ...
	SetName(name string)
	// Age ...
	Age() int
	// Age ...
	SetAge(age int) int
	// AgeAndName ...
	AgeAndName() (int, string)
	SetAgeAndName(name string, age int)
	// TelephoneAndName ...
	GetNameAndTelephone() (name, telephone string)
	SetNameAndTelephone(name, telephone string)
}
";

pub const TEST_IFACE_LOCAL: &str = "// DO NOT EDIT: Auto generated

package footest

// TestInterface ...
type TestInterface interface {
	GetUser(userID string) *User
	CreateUser(user *User) (*User, error)
}
";

/// Temporary directory holding Go sources for one test.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Workspace {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }
}

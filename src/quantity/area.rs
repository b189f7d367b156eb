quantity!(SquareFeet, "sqft");
